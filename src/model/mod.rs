//! Data model.
//!
//! [`Value`] and [`DataFrame`] describe the input side: the scalars and the
//! tabular dataset that get rendered onto a slide. [`Document`] and [`Table`]
//! describe the read-back side: what a saved presentation contains.

mod document;
mod frame;
mod table;
mod value;

pub use document::*;
pub use frame::*;
pub use table::*;
pub use value::*;
