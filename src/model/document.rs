//! Read-back model of a saved presentation.

use super::Table;
use serde::{Deserialize, Serialize};

/// Presentation metadata from docProps/core.xml and docProps/app.xml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Document author/creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Application that created the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    /// Number of slides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_count: Option<u32>,
}

/// A shape recovered from a slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// A text-bearing shape (text box or placeholder)
    Text {
        /// Shape name
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Non-empty paragraphs in order
        paragraphs: Vec<String>,
    },
    /// A table graphic frame
    Table(Table),
}

/// One slide's shapes in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideContent {
    /// Slide index (0-based)
    pub index: usize,

    /// Part name, e.g. `ppt/slides/slide1.xml`
    pub part: String,

    /// Shapes in z-order
    #[serde(default)]
    pub content: Vec<Block>,
}

impl SlideContent {
    /// Create an empty slide record.
    pub fn new(index: usize, part: impl Into<String>) -> Self {
        Self {
            index,
            part: part.into(),
            content: Vec::new(),
        }
    }

    /// Add a block.
    pub fn add_block(&mut self, block: Block) {
        self.content.push(block);
    }

    /// Tables on this slide.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Paragraph texts of all non-table shapes.
    pub fn texts(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|b| match b {
                Block::Text { paragraphs, .. } => Some(paragraphs),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// A presentation as read back from a package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Metadata
    pub metadata: Metadata,

    /// Slides in presentation order
    #[serde(default)]
    pub slides: Vec<SlideContent>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slide.
    pub fn add_slide(&mut self, slide: SlideContent) {
        self.slides.push(slide);
    }

    /// All tables across all slides.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.slides.iter().flat_map(|s| s.tables())
    }

    /// Find a table by shape name.
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables().find(|t| t.name.as_deref() == Some(name))
    }
}
