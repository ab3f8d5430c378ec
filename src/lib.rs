//! # pptable
//!
//! Render tabular data as formatted tables on PowerPoint slides.
//!
//! A [`DataFrame`] is laid out on a slide as a grid of cells, each value
//! turned into display text by [`format_value`] using a per-column format
//! specification. The presentation is written as an Office Open XML package
//! and can be read back for inspection.
//!
//! ## Quick Start
//!
//! ```
//! use pptable::{add_slide, add_title, df_to_table, DataFrame, Presentation};
//! use pptable::{TableOptions, TitleOptions, Value};
//!
//! let frame = DataFrame::new(
//!     vec!["region", "units"],
//!     vec![
//!         vec![Value::from("North"), Value::Int(12_500)],
//!         vec![Value::from("South"), Value::Int(9_870)],
//!     ],
//! )?;
//!
//! let mut pres = Presentation::new();
//! let slide = add_slide(&mut pres);
//! add_title(slide, &TitleOptions::new("Units by region"));
//! df_to_table(slide, &frame, &TableOptions::new().with_name("Units"))?;
//!
//! let bytes = pres.to_bytes()?;
//! let doc = pptable::PresentationReader::from_bytes(bytes)?.parse()?;
//! let table = doc.table_by_name("Units").unwrap();
//! assert_eq!(table.cell(1, 1).unwrap().text, "12,500");
//! # Ok::<(), pptable::Error>(())
//! ```
//!
//! ## Features
//!
//! - `csv` (default): load frames from CSV with [`DataFrame::from_csv_path`]

pub mod container;
pub mod error;
pub mod format;
pub mod model;
pub mod options;
pub mod pptx;
pub mod render;
pub mod style;
pub mod table;
pub mod units;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use error::{Error, Result};
pub use format::{format_value, round_to_n, FormatSpec};
pub use model::{DataFrame, Document, Metadata, Value};
pub use options::{TableOptions, TitleOptions};
pub use pptx::{Presentation, PresentationReader, Shape, ShapeKind, Slide, SlideLayout};
pub use style::{Alignment, Fill, Font, RgbColor};
pub use table::{add_slide, add_title, df_to_table, format_table};
pub use units::Length;

use std::path::Path;

/// Write `frame` to a new single-slide presentation at `path`.
///
/// The slide gets a title text box when `title` is given. Geometry the title
/// leaves unset is filled by [`TitleOptions::above`], so by default it sits in
/// a 1 cm band directly above the table.
///
/// # Example
///
/// ```no_run
/// use pptable::{DataFrame, TableOptions, TitleOptions};
///
/// let frame = DataFrame::from_csv_path("sales.csv")?;
/// pptable::df_to_ppt(&frame, "sales.pptx", &TableOptions::default(), Some(&TitleOptions::new("Sales")))?;
/// # Ok::<(), pptable::Error>(())
/// ```
pub fn df_to_ppt(
    frame: &DataFrame,
    path: impl AsRef<Path>,
    options: &TableOptions,
    title: Option<&TitleOptions>,
) -> Result<()> {
    build_presentation(frame, options, title)?.save(path)
}

fn build_presentation(
    frame: &DataFrame,
    options: &TableOptions,
    title: Option<&TitleOptions>,
) -> Result<Presentation> {
    let mut pres = Presentation::new();
    let slide = add_slide(&mut pres);
    if let Some(title) = title {
        add_title(slide, &title.clone().above(options));
    }
    df_to_table(slide, frame, options)?;
    Ok(pres)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_df_to_ppt_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pptx");
        let frame = DataFrame::new(vec!["a"], vec![vec![Value::Int(1)]]).unwrap();

        df_to_ppt(&frame, &path, &TableOptions::default(), Some(&TitleOptions::new("T"))).unwrap();

        let doc = PresentationReader::open(&path).unwrap().parse().unwrap();
        assert_eq!(doc.slides.len(), 1);
        assert_eq!(doc.slides[0].tables().count(), 1);
        assert_eq!(doc.slides[0].texts(), vec!["T"]);
    }

    #[test]
    fn test_title_sits_above_table() {
        let frame = DataFrame::new(vec!["a"], vec![vec![Value::Int(1)]]).unwrap();
        let options = TableOptions::new().with_position(Length::cm(2.0), Length::cm(5.0));
        let pres = build_presentation(&frame, &options, Some(&TitleOptions::new("T"))).unwrap();

        let shapes = pres.slides()[0].shapes();
        let (title, table) = (&shapes[0], &shapes[1]);
        assert!(table.has_table());
        assert_eq!(title.left, table.left);
        assert_eq!(title.width, Length::cm(4.0));
        assert_eq!(title.top.to_emu() + title.height.to_emu(), table.top.to_emu());
        assert!(title.top < table.top);
    }
}
