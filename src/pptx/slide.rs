//! Slides and their shape tree.

use super::shapes::{Shape, ShapeKind, Table, TextFrame};
use crate::error::Result;
use crate::style::escape_xml;
use crate::units::Length;
use std::fmt::Write as FmtWrite;

const NS_DECLS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

/// Layout a slide is based on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlideLayout {
    /// No placeholders
    #[default]
    Blank,
    /// A title placeholder only
    TitleOnly,
}

impl SlideLayout {
    /// Part number of the layout (`slideLayoutN.xml`).
    pub(crate) fn part_number(self) -> usize {
        match self {
            SlideLayout::Blank => 1,
            SlideLayout::TitleOnly => 2,
        }
    }
}

/// A slide under construction.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    layout: SlideLayout,
    title: Option<String>,
    shapes: Vec<Shape>,
}

impl Slide {
    pub(crate) fn new(layout: SlideLayout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    /// Layout the slide uses.
    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    /// Title placeholder text.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the title placeholder text.
    ///
    /// Only written for slides using [`SlideLayout::TitleOnly`].
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Shapes in z-order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Mutable shapes in z-order.
    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    /// First shape with `name`.
    pub fn shape_by_name(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.name() == name)
    }

    /// Add a `rows × cols` table; size is split evenly across the grid.
    pub fn add_table(
        &mut self,
        rows: usize,
        cols: usize,
        left: Length,
        top: Length,
        width: Length,
        height: Length,
    ) -> &mut Shape {
        self.insert_table(Table::new(rows, cols, width, height), left, top)
    }

    /// Place an already-built table on the slide.
    pub fn insert_table(&mut self, table: Table, left: Length, top: Length) -> &mut Shape {
        let id = self.next_shape_id();
        let (width, height) = (table.width(), table.height());
        let mut shape = Shape::new(id, format!("Table {}", id - 1), left, top, ShapeKind::Table(table));
        shape.width = width;
        shape.height = height;
        self.push(shape)
    }

    /// Add an empty text box.
    pub fn add_textbox(&mut self, left: Length, top: Length, width: Length, height: Length) -> &mut Shape {
        let id = self.next_shape_id();
        let mut shape = Shape::new(
            id,
            format!("TextBox {}", id - 1),
            left,
            top,
            ShapeKind::TextBox(TextFrame::new()),
        );
        shape.width = width;
        shape.height = height;
        self.push(shape)
    }

    fn push(&mut self, shape: Shape) -> &mut Shape {
        let index = self.shapes.len();
        self.shapes.push(shape);
        &mut self.shapes[index]
    }

    /// Id 1 is the group shape; the title placeholder takes 2 when present.
    fn next_shape_id(&self) -> u32 {
        let reserved = match self.layout {
            SlideLayout::Blank => 1,
            SlideLayout::TitleOnly => 2,
        };
        self.shapes.iter().map(|s| s.id).max().unwrap_or(reserved).max(reserved) + 1
    }

    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(xml, "<p:sld {}>", NS_DECLS)?;
        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(concat!(
            "<p:grpSpPr><a:xfrm>",
            r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
            r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#,
            "</a:xfrm></p:grpSpPr>"
        ));

        if self.layout == SlideLayout::TitleOnly {
            self.write_title(&mut xml)?;
        }

        for shape in &self.shapes {
            shape.write_xml(&mut xml)?;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        Ok(xml)
    }

    fn write_title(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<p:sp><p:nvSpPr>");
        xml.push_str(r#"<p:cNvPr id="2" name="Title 1"/>"#);
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
        xml.push_str(r#"<p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>"#);
        xml.push_str("<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p>");
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            write!(
                xml,
                r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#,
                escape_xml(title)
            )?;
        }
        xml.push_str(r#"<a:endParaRPr lang="en-US" dirty="0"/></a:p></p:txBody></p:sp>"#);
        Ok(())
    }

    pub(crate) fn rels_xml(&self) -> Result<String> {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
        write!(
            xml,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout{}.xml"/>"#,
            self.layout.part_number()
        )?;
        xml.push_str("</Relationships>");
        Ok(xml)
    }
}
