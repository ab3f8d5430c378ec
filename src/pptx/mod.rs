//! PPTX (PowerPoint) presentations.
//!
//! [`Presentation`] builds a package from slides, tables and text boxes and
//! writes it as Office Open XML. [`PresentationReader`] reads a package back
//! into the [`Document`](crate::model::Document) model.

mod package;
mod presentation;
mod reader;
mod shapes;
mod slide;

pub use presentation::{Presentation, DEFAULT_SLIDE_HEIGHT, DEFAULT_SLIDE_WIDTH};
pub use reader::{parse_slide, PresentationReader};
pub use shapes::{Paragraph, Shape, ShapeKind, Table, TableCell, TableRow, TextFrame, DEFAULT_TABLE_STYLE};
pub use slide::{Slide, SlideLayout};
