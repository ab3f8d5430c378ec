//! Reads a saved presentation back into a [`Document`].

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::model::{Block, Cell, CellAlignment, Document, Metadata, Row, SlideContent, Table};
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Reader for `.pptx` packages.
///
/// Recovers slide order, table grids with their cell text and basic cell
/// formatting, and the paragraphs of text shapes.
pub struct PresentationReader {
    container: OoxmlContainer,
    slide_parts: Vec<String>,
}

impl PresentationReader {
    /// Open a presentation file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_container(OoxmlContainer::open(path)?)
    }

    /// Read a presentation from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_container(OoxmlContainer::from_bytes(data)?)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        if !container.exists("ppt/presentation.xml") {
            return Err(Error::MissingComponent("ppt/presentation.xml".to_string()));
        }
        let slide_parts = Self::slide_parts(&container)?;
        tracing::debug!(slides = slide_parts.len(), "opened presentation");
        Ok(Self {
            container,
            slide_parts,
        })
    }

    /// Slide part names in `p:sldIdLst` order.
    fn slide_parts(container: &OoxmlContainer) -> Result<Vec<String>> {
        let rels = container.read_relationships("ppt/presentation.xml")?;
        let xml = container.read_xml("ppt/presentation.xml")?;

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut parts = Vec::new();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().local_name().as_ref() == b"sldId" =>
                {
                    // r:id is the only namespaced "id" attribute on p:sldId
                    let rel_id = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.local_name().as_ref() == b"id" && a.key.prefix().is_some())
                        .map(|a| String::from_utf8_lossy(&a.value).to_string());
                    if let Some(rel) = rel_id.as_deref().and_then(|id| rels.get(id)) {
                        parts.push(OoxmlContainer::resolve_path("ppt/presentation.xml", &rel.target));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(parts)
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slide_parts.len()
    }

    /// The underlying container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }

    /// Package metadata.
    pub fn metadata(&self) -> Result<Metadata> {
        let mut meta = self.container.parse_metadata()?;
        meta.slide_count = Some(self.slide_parts.len() as u32);
        Ok(meta)
    }

    /// Parse every slide.
    pub fn parse(&self) -> Result<Document> {
        let mut doc = Document::new();
        doc.metadata = self.metadata()?;

        for (index, part) in self.slide_parts.iter().enumerate() {
            let xml = self.container.read_xml(part)?;
            let mut slide = SlideContent::new(index, part.clone());
            for block in parse_slide(&xml)? {
                slide.add_block(block);
            }
            tracing::trace!(slide = index, blocks = slide.content.len(), "parsed slide");
            doc.add_slide(slide);
        }

        Ok(doc)
    }
}

/// Where the parser currently is within a shape.
#[derive(Default)]
struct ShapeState {
    name: Option<String>,
    paragraphs: Vec<String>,
    paragraph: String,
    in_text: bool,
    /// Paragraph index within the current text body
    paragraph_index: usize,
    /// Run index within the current paragraph
    run_index: usize,
}

impl ShapeState {
    fn start_paragraph(&mut self) {
        self.paragraph.clear();
        self.run_index = 0;
    }

    fn end_paragraph(&mut self) {
        self.paragraphs.push(std::mem::take(&mut self.paragraph));
        self.paragraph_index += 1;
    }

    /// True for the first run of the first paragraph.
    fn at_first_run(&self) -> bool {
        self.paragraph_index == 0 && self.run_index == 0
    }
}

#[derive(Default)]
struct TableState {
    table: Table,
    row: Row,
    cell: Cell,
    in_cell: bool,
    in_cell_props: bool,
    /// Inside an `a:lnX` border of the cell properties
    in_border: bool,
}

const BORDER_TAGS: [&[u8]; 6] = [b"lnL", b"lnR", b"lnT", b"lnB", b"lnTlToBr", b"lnBlToTr"];

/// Event handler collecting the blocks of one slide.
#[derive(Default)]
struct SlideParser {
    blocks: Vec<Block>,
    shape: ShapeState,
    table: Option<TableState>,
    in_sp: bool,
}

impl SlideParser {
    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        let shape = &mut self.shape;
        let local = e.name().local_name();
        let tag = local.as_ref();

        if BORDER_TAGS.contains(&tag) {
            if let Some(t) = self.table.as_mut() {
                t.in_border = !empty;
            }
            return;
        }

        match tag {
            b"sp" if !empty => {
                self.in_sp = true;
                *shape = ShapeState::default();
            }
            b"graphicFrame" if !empty => *shape = ShapeState::default(),
            b"cNvPr" => shape.name = attr(e, b"name"),
            b"tbl" if !empty => {
                let mut state = TableState::default();
                state.table.name = shape.name.clone();
                self.table = Some(state);
            }
            b"gridCol" => {
                if let Some(t) = self.table.as_mut() {
                    let width = attr(e, b"w").and_then(|w| w.parse().ok()).unwrap_or(0);
                    t.table.column_widths.push(width);
                }
            }
            b"tr" => {
                if let Some(t) = self.table.as_mut() {
                    t.row = Row::new();
                    t.row.height = attr(e, b"h").and_then(|h| h.parse().ok());
                }
            }
            b"tc" => {
                if let Some(t) = self.table.as_mut() {
                    t.cell = Cell::new();
                    t.in_cell = !empty;
                    shape.paragraphs.clear();
                    shape.paragraph_index = 0;
                    if empty {
                        t.row.add_cell(std::mem::take(&mut t.cell));
                    }
                }
            }
            b"tcPr" => {
                if let Some(t) = self.table.as_mut() {
                    t.in_cell_props = !empty;
                }
            }
            b"srgbClr" => {
                if let Some(t) = self.table.as_mut() {
                    if t.in_cell_props && !t.in_border {
                        t.cell.background = attr(e, b"val");
                    }
                }
            }
            b"p" => {
                shape.start_paragraph();
                if empty {
                    shape.end_paragraph();
                }
            }
            b"pPr" => {
                if let Some(t) = self.table.as_mut().filter(|t| t.in_cell) {
                    if shape.paragraph_index == 0 {
                        if let Some(algn) = attr(e, b"algn") {
                            t.cell.alignment = CellAlignment::from_algn(&algn);
                        }
                    }
                }
            }
            b"rPr" => {
                let first_run = shape.at_first_run();
                if let Some(t) = self.table.as_mut().filter(|t| t.in_cell && first_run) {
                    if let Some(b) = attr(e, b"b") {
                        t.cell.bold = b == "1" || b == "true";
                    }
                    if let Some(sz) = attr(e, b"sz").and_then(|s| s.parse::<f64>().ok()) {
                        t.cell.font_size = Some(sz / 100.0);
                    }
                }
            }
            b"t" if !empty => shape.in_text = true,
            b"br" => shape.paragraph.push('\n'),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.shape.in_text {
            self.shape.paragraph.push_str(text);
        }
    }

    fn close(&mut self, tag: &[u8]) {
        let shape = &mut self.shape;

        if BORDER_TAGS.contains(&tag) {
            if let Some(t) = self.table.as_mut() {
                t.in_border = false;
            }
            return;
        }

        match tag {
            b"t" => shape.in_text = false,
            b"r" => shape.run_index += 1,
            b"p" => shape.end_paragraph(),
            b"tcPr" => {
                if let Some(t) = self.table.as_mut() {
                    t.in_cell_props = false;
                }
            }
            b"tc" => {
                if let Some(t) = self.table.as_mut() {
                    t.cell.text = shape.paragraphs.join("\n");
                    t.row.add_cell(std::mem::take(&mut t.cell));
                    t.in_cell = false;
                    shape.paragraphs.clear();
                }
            }
            b"tr" => {
                if let Some(t) = self.table.as_mut() {
                    let row = std::mem::take(&mut t.row);
                    t.table.add_row(row);
                }
            }
            b"tbl" => {
                if let Some(t) = self.table.take() {
                    self.blocks.push(Block::Table(t.table));
                }
            }
            b"sp" => {
                self.in_sp = false;
                let paragraphs: Vec<String> = std::mem::take(&mut shape.paragraphs)
                    .into_iter()
                    .filter(|p| !p.trim().is_empty())
                    .collect();
                if !paragraphs.is_empty() {
                    self.blocks.push(Block::Text {
                        name: shape.name.take(),
                        paragraphs,
                    });
                }
            }
            _ => {}
        }
    }
}

/// Parse one slide part into blocks in z-order.
pub fn parse_slide(xml: &str) -> Result<Vec<Block>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut parser = SlideParser::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.open(&e, false),
            Ok(Event::Empty(e)) => parser.open(&e, true),
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                parser.text(&text);
            }
            Ok(Event::End(e)) => parser.close(e.name().local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if parser.in_sp || parser.table.is_some() {
        return Err(Error::XmlParse("unexpected end of slide".to_string()));
    }
    Ok(parser.blocks)
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::{Presentation, SlideLayout};
    use crate::style::{Alignment, Fill, RgbColor};
    use crate::units::Length;

    #[test]
    fn test_parse_table_cells() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="2" name="Sales"/></p:nvGraphicFramePr>
            <a:graphic><a:graphicData><a:tbl>
              <a:tblGrid><a:gridCol w="100"/><a:gridCol w="200"/></a:tblGrid>
              <a:tr h="50">
                <a:tc><a:txBody><a:p><a:pPr algn="ctr"/><a:r><a:rPr b="1" sz="1400"/><a:t>Region</a:t></a:r></a:p></a:txBody>
                  <a:tcPr><a:lnL w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:lnL>
                  <a:solidFill><a:srgbClr val="4F81BD"/></a:solidFill></a:tcPr></a:tc>
                <a:tc gridSpan="2"><a:txBody><a:p><a:r><a:t>A &amp; B</a:t></a:r></a:p><a:p><a:r><a:t>line 2</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>
              </a:tr>
            </a:tbl></a:graphicData></a:graphic></p:graphicFrame>
            </p:spTree></p:cSld></p:sld>"#;

        let blocks = parse_slide(xml).unwrap();
        assert_eq!(blocks.len(), 1);
        let Block::Table(table) = &blocks[0] else {
            panic!("expected a table");
        };
        assert_eq!(table.name.as_deref(), Some("Sales"));
        assert_eq!(table.column_widths, vec![100, 200]);
        assert_eq!(table.rows[0].height, Some(50));

        let first = table.cell(0, 0).unwrap();
        assert_eq!(first.text, "Region");
        assert!(first.bold);
        assert_eq!(first.font_size, Some(14.0));
        assert_eq!(first.alignment, CellAlignment::Center);
        assert_eq!(first.background.as_deref(), Some("4F81BD"));

        let second = table.cell(0, 1).unwrap();
        assert_eq!(second.text, "A & B\nline 2");
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(second.background, None);
    }

    #[test]
    fn test_parse_text_shape() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:cNvPr id="2" name="TextBox 1"/></p:nvSpPr>
            <p:txBody><a:bodyPr/><a:p><a:r><a:t>Quarterly</a:t></a:r><a:r><a:t> results</a:t></a:r></a:p><a:p/></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#;
        let blocks = parse_slide(xml).unwrap();
        match &blocks[0] {
            Block::Text { name, paragraphs } => {
                assert_eq!(name.as_deref(), Some("TextBox 1"));
                assert_eq!(paragraphs, &vec!["Quarterly results".to_string()]);
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_written_presentation() {
        let mut pres = Presentation::new();
        pres.set_title("Report");
        let slide = pres.add_slide(SlideLayout::TitleOnly);
        slide.set_title("Overview");
        let shape = slide.add_table(2, 2, Length::cm(1.0), Length::cm(1.0), Length::cm(8.0), Length::cm(2.0));
        shape.set_name("Numbers");
        let table = shape.table_mut().unwrap();
        let cell = table.cell_mut(1, 1).unwrap();
        cell.set_text("1,234");
        cell.set_alignment(Alignment::Right);
        cell.fill = Fill::Solid(RgbColor(233, 237, 244));

        let reader = PresentationReader::from_bytes(pres.to_bytes().unwrap()).unwrap();
        assert_eq!(reader.slide_count(), 1);
        let doc = reader.parse().unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("Report"));
        assert_eq!(doc.metadata.slide_count, Some(1));
        assert_eq!(doc.slides[0].texts(), vec!["Overview"]);

        let table = doc.table_by_name("Numbers").unwrap();
        assert_eq!(table.row_count(), 2);
        let cell = table.cell(1, 1).unwrap();
        assert_eq!(cell.text, "1,234");
        assert_eq!(cell.alignment, CellAlignment::Right);
        assert_eq!(cell.background.as_deref(), Some("E9EDF4"));
        assert!(table.cell(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_not_a_presentation() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            std::io::Write::write_all(&mut zip, b"<w:document/>").unwrap();
            zip.finish().unwrap();
        }
        let result = PresentationReader::from_bytes(cursor.into_inner());
        assert!(matches!(result, Err(Error::MissingComponent(_))));
    }
}
