//! Shapes placed on a slide: table graphic frames and text boxes.

use crate::error::{Error, Result};
use crate::style::{escape_xml, write_solid_fill, Alignment, AutoSize, Borders, Fill, Font};
use crate::units::Length;
use std::fmt::Write as FmtWrite;

/// Built-in "Medium Style 2 - Accent 1" table style.
pub const DEFAULT_TABLE_STYLE: &str = "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}";

const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

/// A paragraph holding a single run of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Run text
    pub text: String,
    /// Run character properties
    pub font: Font,
    /// Paragraph alignment; `None` inherits
    pub alignment: Option<Alignment>,
}

impl Paragraph {
    /// Create a paragraph with text and no formatting.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    fn write_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<a:p>");
        if let Some(alignment) = self.alignment {
            write!(xml, r#"<a:pPr algn="{}"/>"#, alignment.algn())?;
        }
        if !self.text.is_empty() {
            xml.push_str("<a:r>");
            self.font.write_xml(xml, "a:rPr")?;
            write!(xml, "<a:t>{}</a:t>", escape_xml(&self.text))?;
            xml.push_str("</a:r>");
        }
        self.font.write_xml(xml, "a:endParaRPr")?;
        xml.push_str("</a:p>");
        Ok(())
    }
}

/// The text content of a cell or text box.
///
/// Always holds at least one paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    paragraphs: Vec<Paragraph>,
    /// Autofit behaviour
    pub auto_size: AutoSize,
    /// Wrap text at the shape edge; `None` inherits
    pub word_wrap: Option<bool>,
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
            auto_size: AutoSize::None,
            word_wrap: None,
        }
    }
}

impl TextFrame {
    /// Create an empty text frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// All text, paragraphs joined with `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the text; each line becomes a paragraph.
    ///
    /// Formatting of the first paragraph is carried over to every new one.
    pub fn set_text(&mut self, text: &str) {
        let template = Paragraph {
            text: String::new(),
            ..self.paragraphs[0].clone()
        };
        self.paragraphs = text
            .split('\n')
            .map(|line| Paragraph {
                text: line.to_string(),
                ..template.clone()
            })
            .collect();
    }

    /// Paragraphs in order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Mutable paragraphs in order.
    pub fn paragraphs_mut(&mut self) -> &mut [Paragraph] {
        &mut self.paragraphs
    }

    /// The first paragraph.
    pub fn first_paragraph_mut(&mut self) -> &mut Paragraph {
        &mut self.paragraphs[0]
    }

    /// Append an empty paragraph and return it.
    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        let index = self.paragraphs.len();
        self.paragraphs.push(Paragraph::default());
        &mut self.paragraphs[index]
    }

    /// Write `a:bodyPr`, `a:lstStyle` and the paragraphs.
    fn write_body(&self, xml: &mut String, default_wrap: Option<&str>) -> Result<()> {
        xml.push_str("<a:bodyPr");
        match (self.word_wrap, default_wrap) {
            (Some(true), _) => xml.push_str(r#" wrap="square""#),
            (Some(false), _) => xml.push_str(r#" wrap="none""#),
            (None, Some(wrap)) => write!(xml, r#" wrap="{}""#, wrap)?,
            (None, None) => {}
        }
        match self.auto_size {
            AutoSize::None => xml.push_str("/>"),
            AutoSize::ShapeToFitText => xml.push_str("><a:spAutoFit/></a:bodyPr>"),
            AutoSize::TextToFitShape => xml.push_str("><a:normAutofit/></a:bodyPr>"),
        }
        xml.push_str("<a:lstStyle/>");
        for paragraph in &self.paragraphs {
            paragraph.write_xml(xml)?;
        }
        Ok(())
    }
}

/// One table cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    /// Cell text and its formatting
    pub text_frame: TextFrame,
    /// Cell background
    pub fill: Fill,
    /// Cell borders
    pub borders: Borders,
}

impl TableCell {
    /// Cell text.
    pub fn text(&self) -> String {
        self.text_frame.text()
    }

    /// Replace the cell text.
    pub fn set_text(&mut self, text: &str) {
        self.text_frame.set_text(text);
    }

    /// Character properties of the first paragraph.
    pub fn font_mut(&mut self) -> &mut Font {
        &mut self.text_frame.first_paragraph_mut().font
    }

    /// Set the alignment of the first paragraph.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.text_frame.first_paragraph_mut().alignment = Some(alignment);
    }

    fn write_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<a:tc><a:txBody>");
        self.text_frame.write_body(xml, None)?;
        xml.push_str("</a:txBody>");

        if self.borders.is_empty() && self.fill == Fill::Inherit {
            xml.push_str("<a:tcPr/>");
        } else {
            xml.push_str("<a:tcPr>");
            let sides = [
                ("a:lnL", self.borders.left),
                ("a:lnR", self.borders.right),
                ("a:lnT", self.borders.top),
                ("a:lnB", self.borders.bottom),
            ];
            for (tag, border) in sides {
                if let Some(border) = border {
                    border.write_xml(xml, tag)?;
                }
            }
            match self.fill {
                Fill::Inherit => {}
                Fill::Background => xml.push_str("<a:noFill/>"),
                Fill::Solid(color) => write_solid_fill(xml, color)?,
            }
            xml.push_str("</a:tcPr>");
        }

        xml.push_str("</a:tc>");
        Ok(())
    }
}

/// A row of cells with its height.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Row height
    pub height: Length,
    /// Cells left to right
    pub cells: Vec<TableCell>,
}

/// A grid of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Length>,
    rows: Vec<TableRow>,
    /// Style the first row as a header
    pub first_row: bool,
    /// Alternate row shading
    pub band_row: bool,
    /// Table style GUID
    pub style_id: String,
}

impl Table {
    /// Create a `rows × cols` table spanning `width × height`.
    ///
    /// Widths and heights are split evenly; the last column and row absorb
    /// the remainder so the totals match exactly.
    pub fn new(rows: usize, cols: usize, width: Length, height: Length) -> Self {
        let columns = split_evenly(width, cols);
        let rows = split_evenly(height, rows)
            .into_iter()
            .map(|height| TableRow {
                height,
                cells: vec![TableCell::default(); cols],
            })
            .collect();

        Self {
            columns,
            rows,
            first_row: true,
            band_row: true,
            style_id: DEFAULT_TABLE_STYLE.to_string(),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column widths.
    pub fn column_widths(&self) -> &[Length] {
        &self.columns
    }

    /// Rows.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Total width.
    pub fn width(&self) -> Length {
        Length::emu(self.columns.iter().map(|c| c.to_emu()).sum())
    }

    /// Total height.
    pub fn height(&self) -> Length {
        Length::emu(self.rows.iter().map(|r| r.height.to_emu()).sum())
    }

    /// Cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Result<&TableCell> {
        let row_count = self.rows.len();
        let cells = &self
            .rows
            .get(row)
            .ok_or(Error::IndexOutOfRange {
                what: "row",
                index: row,
                len: row_count,
            })?
            .cells;
        cells.get(col).ok_or(Error::IndexOutOfRange {
            what: "column",
            index: col,
            len: cells.len(),
        })
    }

    /// Mutable cell at `(row, col)`.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut TableCell> {
        let row_count = self.rows.len();
        let cells = &mut self
            .rows
            .get_mut(row)
            .ok_or(Error::IndexOutOfRange {
                what: "row",
                index: row,
                len: row_count,
            })?
            .cells;
        let len = cells.len();
        cells.get_mut(col).ok_or(Error::IndexOutOfRange {
            what: "column",
            index: col,
            len,
        })
    }

    /// Iterate over every cell mutably, row by row.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TableCell> {
        self.rows.iter_mut().flat_map(|r| r.cells.iter_mut())
    }

    /// Set the width of column `index`.
    pub fn set_column_width(&mut self, index: usize, width: Length) -> Result<()> {
        let len = self.columns.len();
        let column = self.columns.get_mut(index).ok_or(Error::IndexOutOfRange {
            what: "column",
            index,
            len,
        })?;
        *column = width;
        Ok(())
    }

    /// Set the height of row `index`.
    pub fn set_row_height(&mut self, index: usize, height: Length) -> Result<()> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or(Error::IndexOutOfRange {
            what: "row",
            index,
            len,
        })?;
        row.height = height;
        Ok(())
    }

    fn write_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<a:tbl>");
        write!(
            xml,
            r#"<a:tblPr firstRow="{}" bandRow="{}"><a:tableStyleId>{}</a:tableStyleId></a:tblPr>"#,
            self.first_row as u8,
            self.band_row as u8,
            escape_xml(&self.style_id)
        )?;

        xml.push_str("<a:tblGrid>");
        for width in &self.columns {
            write!(xml, r#"<a:gridCol w="{}"/>"#, width.to_emu())?;
        }
        xml.push_str("</a:tblGrid>");

        for row in &self.rows {
            write!(xml, r#"<a:tr h="{}">"#, row.height.to_emu())?;
            for cell in &row.cells {
                cell.write_xml(xml)?;
            }
            xml.push_str("</a:tr>");
        }

        xml.push_str("</a:tbl>");
        Ok(())
    }
}

fn split_evenly(total: Length, parts: usize) -> Vec<Length> {
    if parts == 0 {
        return Vec::new();
    }
    let each = total.to_emu() / parts as i64;
    let mut sizes = vec![Length::emu(each); parts];
    sizes[parts - 1] = Length::emu(total.to_emu() - each * (parts as i64 - 1));
    sizes
}

/// What a shape contains.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// A table in a graphic frame
    Table(Table),
    /// A text box
    TextBox(TextFrame),
}

/// A positioned shape on a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub(crate) id: u32,
    name: String,
    /// Left edge
    pub left: Length,
    /// Top edge
    pub top: Length,
    /// Width; tables use the sum of their column widths instead
    pub width: Length,
    /// Height; tables use the sum of their row heights instead
    pub height: Length,
    /// Content
    pub kind: ShapeKind,
}

impl Shape {
    pub(crate) fn new(id: u32, name: String, left: Length, top: Length, kind: ShapeKind) -> Self {
        Self {
            id,
            name,
            left,
            top,
            width: Length::ZERO,
            height: Length::ZERO,
            kind,
        }
    }

    /// Shape id, unique within its slide.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Shape name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the shape.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether this shape holds a table.
    pub fn has_table(&self) -> bool {
        matches!(self.kind, ShapeKind::Table(_))
    }

    /// The table, if this is a graphic frame.
    pub fn table(&self) -> Option<&Table> {
        match &self.kind {
            ShapeKind::Table(t) => Some(t),
            ShapeKind::TextBox(_) => None,
        }
    }

    /// The table, mutably.
    pub fn table_mut(&mut self) -> Option<&mut Table> {
        match &mut self.kind {
            ShapeKind::Table(t) => Some(t),
            ShapeKind::TextBox(_) => None,
        }
    }

    /// The text frame, if this is a text box.
    pub fn text_frame(&self) -> Option<&TextFrame> {
        match &self.kind {
            ShapeKind::TextBox(tf) => Some(tf),
            ShapeKind::Table(_) => None,
        }
    }

    /// The text frame, mutably.
    pub fn text_frame_mut(&mut self) -> Option<&mut TextFrame> {
        match &mut self.kind {
            ShapeKind::TextBox(tf) => Some(tf),
            ShapeKind::Table(_) => None,
        }
    }

    /// Extent written to the slide.
    pub fn extent(&self) -> (Length, Length) {
        match &self.kind {
            ShapeKind::Table(t) => (t.width(), t.height()),
            ShapeKind::TextBox(_) => (self.width, self.height),
        }
    }

    pub(crate) fn write_xml(&self, xml: &mut String) -> Result<()> {
        let (cx, cy) = self.extent();
        let name = escape_xml(&self.name);

        match &self.kind {
            ShapeKind::Table(table) => {
                xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
                write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, self.id, name)?;
                xml.push_str(r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr>"#);
                xml.push_str("<p:nvPr/></p:nvGraphicFramePr>");
                write!(
                    xml,
                    r#"<p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm>"#,
                    self.left.to_emu(),
                    self.top.to_emu(),
                    cx.to_emu(),
                    cy.to_emu()
                )?;
                write!(xml, r#"<a:graphic><a:graphicData uri="{}">"#, TABLE_URI)?;
                table.write_xml(xml)?;
                xml.push_str("</a:graphicData></a:graphic></p:graphicFrame>");
            }
            ShapeKind::TextBox(text_frame) => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, self.id, name)?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);
                xml.push_str("<p:spPr>");
                write!(
                    xml,
                    r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
                    self.left.to_emu(),
                    self.top.to_emu(),
                    cx.to_emu(),
                    cy.to_emu()
                )?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
                xml.push_str("</p:spPr><p:txBody>");
                text_frame.write_body(xml, Some("none"))?;
                xml.push_str("</p:txBody></p:sp>");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Border, RgbColor};

    #[test]
    fn test_split_evenly() {
        let table = Table::new(3, 3, Length::emu(1000), Length::emu(100));
        let widths: Vec<i64> = table.column_widths().iter().map(|w| w.to_emu()).collect();
        assert_eq!(widths, vec![333, 333, 334]);
        assert_eq!(table.width(), Length::emu(1000));
        assert_eq!(table.height(), Length::emu(100));
    }

    #[test]
    fn test_cell_access_out_of_range() {
        let mut table = Table::new(2, 2, Length::cm(4.0), Length::cm(4.0));
        assert!(table.cell(1, 1).is_ok());
        assert!(matches!(
            table.cell(2, 0),
            Err(Error::IndexOutOfRange { what: "row", .. })
        ));
        assert!(matches!(
            table.cell_mut(0, 5),
            Err(Error::IndexOutOfRange {
                what: "column",
                index: 5,
                len: 2
            })
        ));
        assert!(table.set_column_width(2, Length::cm(1.0)).is_err());
        assert!(table.set_row_height(1, Length::cm(1.0)).is_ok());
    }

    #[test]
    fn test_set_text_keeps_first_paragraph_format() {
        let mut frame = TextFrame::new();
        frame.first_paragraph_mut().alignment = Some(Alignment::Center);
        frame.set_text("a\nb");
        assert_eq!(frame.paragraphs().len(), 2);
        assert_eq!(frame.paragraphs()[1].alignment, Some(Alignment::Center));
        assert_eq!(frame.text(), "a\nb");
    }

    #[test]
    fn test_cell_xml() {
        let mut cell = TableCell::default();
        cell.set_text("1,234");
        cell.set_alignment(Alignment::Center);
        cell.font_mut().bold = Some(true);
        cell.fill = Fill::Solid(RgbColor(79, 129, 189));
        cell.borders = Borders::all(Border::thin());

        let mut xml = String::new();
        cell.write_xml(&mut xml).unwrap();
        assert!(xml.contains(r#"<a:pPr algn="ctr"/>"#));
        assert!(xml.contains("<a:t>1,234</a:t>"));
        assert!(xml.contains(r#"b="1""#));
        let ln_l = xml.find("<a:lnL").unwrap();
        let ln_b = xml.find("<a:lnB").unwrap();
        let fill = xml.find(r#"<a:srgbClr val="4F81BD"/>"#).unwrap();
        assert!(ln_l < ln_b && ln_b < fill);
    }

    #[test]
    fn test_empty_cell_has_no_run() {
        let mut xml = String::new();
        TableCell::default().write_xml(&mut xml).unwrap();
        assert!(!xml.contains("<a:r>"));
        assert!(xml.contains("<a:tcPr/>"));
    }

    #[test]
    fn test_table_shape_xml() {
        let table = Table::new(1, 2, Length::emu(2000), Length::emu(500));
        let shape = Shape::new(
            2,
            "Sales <2024>".into(),
            Length::emu(10),
            Length::emu(20),
            ShapeKind::Table(table),
        );
        let mut xml = String::new();
        shape.write_xml(&mut xml).unwrap();
        assert!(xml.contains(r#"name="Sales &lt;2024&gt;""#));
        assert!(xml.contains(r#"<a:ext cx="2000" cy="500"/>"#));
        assert!(xml.contains(r#"<a:gridCol w="1000"/>"#));
        assert!(xml.contains(DEFAULT_TABLE_STYLE));
    }

    #[test]
    fn test_text_box_xml() {
        let mut frame = TextFrame::new();
        frame.auto_size = AutoSize::ShapeToFitText;
        frame.set_text("Title");
        let mut shape = Shape::new(3, "TextBox 2".into(), Length::ZERO, Length::ZERO, ShapeKind::TextBox(frame));
        shape.width = Length::inches(2.0);
        let mut xml = String::new();
        shape.write_xml(&mut xml).unwrap();
        assert!(xml.contains(r#"<p:cNvSpPr txBox="1"/>"#));
        assert!(xml.contains(r#"<a:bodyPr wrap="none"><a:spAutoFit/></a:bodyPr>"#));
        assert!(xml.contains(r#"cx="1828800""#));
    }
}
