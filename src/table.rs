//! Inserting data frames into slides as formatted tables.

use crate::error::{Error, Result};
use crate::format::format_value;
use crate::model::DataFrame;
use crate::options::{TableOptions, TitleOptions};
use crate::pptx::{Presentation, Shape, Slide, SlideLayout, Table, TableCell};
use crate::style::{Alignment, AutoSize, Border, Borders, Fill, Font, RgbColor};
use std::borrow::Cow;

/// Typeface applied to styled cells.
pub const TABLE_FONT: &str = "Calibri";

/// Fill of the label column in the transposed layout.
pub const LABEL_FILL: RgbColor = RgbColor(79, 129, 189);

/// Fill of the first data row in the transposed layout.
pub const FIRST_ROW_FILL: RgbColor = RgbColor(233, 237, 244);

/// Font size used by [`format_table`].
pub const FORMAT_TABLE_FONT_SIZE: f64 = 20.0;

/// Append a blank slide.
pub fn add_slide(presentation: &mut Presentation) -> &mut Slide {
    presentation.add_slide(SlideLayout::Blank)
}

/// Insert `frame` into `slide` as a formatted table.
///
/// The default layout puts a header row of column names above the records;
/// the transposed layout drops the header and puts row labels in a leading
/// column instead. Cell text comes from [`format_value`] with the column's
/// format specification (or the type default).
///
/// # Errors
///
/// [`Error::IndexOutOfRange`] when a label, width, height or rounding list
/// is longer than the grid allows, or when `col_formatters` does not have
/// exactly one entry per column.
///
/// # Example
///
/// ```
/// use pptable::{add_slide, df_to_table, DataFrame, Presentation, TableOptions, Value};
///
/// let frame = DataFrame::new(
///     vec!["units", "revenue"],
///     vec![vec![Value::Int(1200), Value::Float(0.5)]],
/// )?;
/// let mut pres = Presentation::new();
/// let slide = add_slide(&mut pres);
/// let options = TableOptions::new().with_col_formatters([",", ".1%"]);
/// let shape = df_to_table(slide, &frame, &options)?;
///
/// let table = shape.table().unwrap();
/// assert_eq!(table.cell(0, 0)?.text(), "units");
/// assert_eq!(table.cell(1, 0)?.text(), "1,200");
/// # Ok::<(), pptable::Error>(())
/// ```
pub fn df_to_table<'s>(
    slide: &'s mut Slide,
    frame: &DataFrame,
    options: &TableOptions,
) -> Result<&'s mut Shape> {
    let (rows, cols) = frame.shape();
    let (left, top, width, height) = options.frame();

    let (grid_rows, grid_cols, row_offset, col_offset) = if options.transposed {
        (rows, cols + 1, 0, 1)
    } else {
        (rows + 1, cols, 1, 0)
    };

    if let Some(formatters) = &options.col_formatters {
        if formatters.len() != cols {
            return Err(Error::IndexOutOfRange {
                what: "column formatter",
                index: formatters.len(),
                len: cols,
            });
        }
    }
    if let Some(rounding) = &options.rounding {
        check_fits("rounding directive", rounding.len(), cols)?;
    }
    check_fits("column width", options.col_widths.len(), grid_cols)?;
    check_fits("row height", options.row_heights.len(), grid_rows)?;

    let mut table = Table::new(grid_rows, grid_cols, width, height);

    // Labels
    if options.transposed {
        let labels = options.rownames.as_deref().unwrap_or(frame.index());
        check_fits("row name", labels.len(), grid_rows)?;
        for (r, label) in labels.iter().enumerate() {
            table.cell_mut(r, 0)?.set_text(label);
        }
    } else {
        let labels = options.colnames.as_deref().unwrap_or(frame.columns());
        check_fits("column name", labels.len(), grid_cols)?;
        for (c, label) in labels.iter().enumerate() {
            table.cell_mut(0, c)?.set_text(label);
        }
    }

    // Values
    for (r, record) in frame.rows().iter().enumerate() {
        for (c, value) in record.iter().enumerate() {
            let value = match options.rounding.as_ref().and_then(|k| k.get(c).copied().flatten()) {
                Some(k) => Cow::Owned(value.round(k.saturating_neg())),
                None => Cow::Borrowed(value),
            };
            let spec = options
                .col_formatters
                .as_ref()
                .map_or("", |specs| specs[c].as_str());
            let text = format_value(&value, spec);
            table.cell_mut(r + row_offset, c + col_offset)?.set_text(&text);
        }
    }

    if !options.white_background {
        style_cells(&mut table, options)?;
    }

    for (i, width) in options.col_widths.iter().enumerate() {
        table.set_column_width(i, *width)?;
    }
    for (i, height) in options.row_heights.iter().enumerate() {
        table.set_row_height(i, *height)?;
    }

    let shape = slide.insert_table(table, left, top);
    if let Some(name) = &options.name {
        shape.set_name(name.clone());
    }

    tracing::debug!(
        name = shape.name(),
        rows = grid_rows,
        cols = grid_cols,
        transposed = options.transposed,
        "inserted table"
    );
    Ok(shape)
}

fn check_fits(what: &'static str, given: usize, slots: usize) -> Result<()> {
    if given > slots {
        return Err(Error::IndexOutOfRange {
            what,
            index: slots,
            len: slots,
        });
    }
    Ok(())
}

fn cell_font(size: f64, bold: bool) -> Font {
    Font {
        name: Some(TABLE_FONT.to_string()),
        size: Some(size),
        bold: Some(bold),
        color: Some(RgbColor::BLACK),
        ..Default::default()
    }
}

fn style_paragraphs(cell: &mut TableCell, font: &Font, alignment: Alignment) {
    for paragraph in cell.text_frame.paragraphs_mut() {
        paragraph.font = font.clone();
        paragraph.alignment = Some(alignment);
    }
}

fn style_cells(table: &mut Table, options: &TableOptions) -> Result<()> {
    let body = cell_font(options.font_size, false);
    let label = cell_font(options.font_size, true);

    for cell in table.cells_mut() {
        cell.text_frame.auto_size = AutoSize::ShapeToFitText;
        style_paragraphs(cell, &body, Alignment::Center);
    }

    if options.transposed {
        for r in 0..table.row_count() {
            let cell = table.cell_mut(r, 0)?;
            cell.fill = Fill::Solid(LABEL_FILL);
            style_paragraphs(cell, &label, Alignment::Left);
        }
        if table.row_count() > 0 {
            for c in 1..table.column_count() {
                table.cell_mut(0, c)?.fill = Fill::Solid(FIRST_ROW_FILL);
            }
        }
    } else {
        for c in 0..table.column_count() {
            style_paragraphs(table.cell_mut(0, c)?, &label, Alignment::Center);
        }
    }
    Ok(())
}

/// Add a centred title text box.
pub fn add_title<'s>(slide: &'s mut Slide, options: &TitleOptions) -> &'s mut Shape {
    let (left, top, width, height) = options.frame();
    let shape = slide.add_textbox(left, top, width, height);

    if let Some(text_frame) = shape.text_frame_mut() {
        text_frame.auto_size = AutoSize::ShapeToFitText;
        let paragraph = text_frame.first_paragraph_mut();
        paragraph.text = options.text.clone();
        paragraph.alignment = Some(Alignment::Center);
        paragraph.font = Font {
            size: Some(options.font_size),
            bold: Some(options.bold),
            italic: Some(options.italic),
            underline: Some(options.underline),
            ..Default::default()
        };
    }

    tracing::debug!(name = shape.name(), text = %options.text, "inserted title");
    shape
}

/// Apply the bordered "plain" look to the top-left `rows × cols` block of cells.
///
/// Each cell gets thin black borders, bold 20 pt black centred text and no
/// background fill.
pub fn format_table(table: &mut Table, rows: usize, cols: usize) -> Result<()> {
    let font = Font {
        size: Some(FORMAT_TABLE_FONT_SIZE),
        bold: Some(true),
        color: Some(RgbColor::BLACK),
        ..Default::default()
    };

    for r in 0..rows {
        for c in 0..cols {
            let cell = table.cell_mut(r, c)?;
            cell.borders = Borders::all(Border::thin());
            for paragraph in cell.text_frame.paragraphs_mut() {
                paragraph.font = Font {
                    name: paragraph.font.name.take(),
                    ..font.clone()
                };
                paragraph.alignment = Some(Alignment::Center);
            }
            cell.fill = Fill::Background;
        }
    }
    Ok(())
}
