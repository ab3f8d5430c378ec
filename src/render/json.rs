//! JSON renderer.

use crate::error::Result;
use crate::model::Document;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Serialize a read-back presentation to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(doc)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(doc)?,
    };
    Ok(json)
}

/// Serialize to pretty-printed JSON.
pub fn to_json_default(doc: &Document) -> Result<String> {
    to_json(doc, JsonFormat::Pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Cell, Row, SlideContent, Table};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.metadata.title = Some("Test".to_string());

        let mut table = Table::new();
        table.name = Some("Sales".to_string());
        let mut row = Row::new();
        row.add_cell(Cell::with_text("1,234"));
        table.add_row(row);

        let mut slide = SlideContent::new(0, "ppt/slides/slide1.xml");
        slide.add_block(Block::Table(table));
        doc.add_slide(slide);
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Test\""));
        assert!(json.contains("\"type\": \"table\""));
        assert!(json.contains("\"text\": \"1,234\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"name\":\"Sales\""));
    }

    #[test]
    fn test_to_json_default() {
        let json = to_json_default(&Document::new()).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_document_roundtrip() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.slides.len(), 1);
        assert_eq!(back.table_by_name("Sales").unwrap().texts(), vec![vec!["1,234".to_string()]]);
    }
}
