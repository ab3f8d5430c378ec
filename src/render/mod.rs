//! Output rendering for read-back presentations.
//!
//! Renders the [`Document`](crate::model::Document) produced by
//! [`PresentationReader`](crate::pptx::PresentationReader) as plain text or JSON.
//!
//! # Example
//!
//! ```no_run
//! use pptable::pptx::PresentationReader;
//! use pptable::render::{to_json, to_text, JsonFormat};
//!
//! let doc = PresentationReader::open("report.pptx")?.parse()?;
//! println!("{}", to_text(&doc));
//! let json = to_json(&doc, JsonFormat::Pretty)?;
//! # Ok::<(), pptable::Error>(())
//! ```

mod json;
mod text;

pub use json::{to_json, to_json_default, JsonFormat};
pub use text::{table_to_text, to_text};
