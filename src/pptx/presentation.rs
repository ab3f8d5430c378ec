//! Presentation writer.

use super::package;
use super::slide::{Slide, SlideLayout};
use crate::error::Result;
use crate::units::Length;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default slide width (10 in, 4:3).
pub const DEFAULT_SLIDE_WIDTH: Length = Length::emu(9_144_000);
/// Default slide height (7.5 in, 4:3).
pub const DEFAULT_SLIDE_HEIGHT: Length = Length::emu(6_858_000);

/// A presentation under construction.
///
/// # Example
///
/// ```
/// use pptable::pptx::{Presentation, SlideLayout};
/// use pptable::units::Length;
///
/// let mut pres = Presentation::new();
/// let slide = pres.add_slide(SlideLayout::Blank);
/// let shape = slide.add_table(2, 2, Length::cm(4.0), Length::cm(4.0), Length::cm(8.0), Length::cm(2.0));
/// assert_eq!(shape.name(), "Table 1");
///
/// let bytes = pres.to_bytes()?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), pptable::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Presentation {
    slides: Vec<Slide>,
    slide_width: Length,
    slide_height: Length,
    title: Option<String>,
    author: Option<String>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    /// Create an empty 4:3 presentation.
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            slide_width: DEFAULT_SLIDE_WIDTH,
            slide_height: DEFAULT_SLIDE_HEIGHT,
            title: None,
            author: None,
        }
    }

    /// Append a slide and return it.
    pub fn add_slide(&mut self, layout: SlideLayout) -> &mut Slide {
        let index = self.slides.len();
        self.slides.push(Slide::new(layout));
        &mut self.slides[index]
    }

    /// Slides in order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Slide at `index`.
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide size as `(width, height)`.
    pub fn slide_size(&self) -> (Length, Length) {
        (self.slide_width, self.slide_height)
    }

    /// Change the slide size.
    pub fn set_slide_size(&mut self, width: Length, height: Length) {
        self.slide_width = width;
        self.slide_height = height;
    }

    /// Document title written to the core properties.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Document author written to the core properties.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = Some(author.into());
    }

    /// Write the presentation to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = self.write_to(BufWriter::new(file))?;
        writer.flush()?;
        tracing::info!(path = %path.display(), slides = self.slides.len(), "saved presentation");
        Ok(())
    }

    /// Serialize the presentation to an in-memory `.pptx`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let cursor = self.write_to(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Write every package part to `writer`, returning it once the archive is finished.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let count = self.slides.len();

        let mut part = |name: &str, content: &str| -> Result<()> {
            tracing::trace!(part = name, bytes = content.len(), "writing part");
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        part("[Content_Types].xml", &package::content_types_xml(count)?)?;
        part("_rels/.rels", &package::root_rels_xml())?;
        part("docProps/core.xml", &package::core_xml(self.title.as_deref(), self.author.as_deref())?)?;
        part("docProps/app.xml", &package::app_xml(count)?)?;
        part(
            "ppt/presentation.xml",
            &package::presentation_xml(count, self.slide_width.to_emu(), self.slide_height.to_emu())?,
        )?;
        part("ppt/_rels/presentation.xml.rels", &package::presentation_rels_xml(count)?)?;
        part("ppt/presProps.xml", package::PRES_PROPS_XML)?;
        part("ppt/viewProps.xml", package::VIEW_PROPS_XML)?;
        part("ppt/tableStyles.xml", package::TABLE_STYLES_XML)?;
        part("ppt/slideMasters/slideMaster1.xml", package::SLIDE_MASTER_XML)?;
        part("ppt/slideMasters/_rels/slideMaster1.xml.rels", package::MASTER_RELS_XML)?;
        part("ppt/slideLayouts/slideLayout1.xml", package::BLANK_LAYOUT_XML)?;
        part("ppt/slideLayouts/_rels/slideLayout1.xml.rels", package::LAYOUT_RELS_XML)?;
        part("ppt/slideLayouts/slideLayout2.xml", package::TITLE_ONLY_LAYOUT_XML)?;
        part("ppt/slideLayouts/_rels/slideLayout2.xml.rels", package::LAYOUT_RELS_XML)?;
        part("ppt/theme/theme1.xml", package::THEME_XML)?;

        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            part(&format!("ppt/slides/slide{}.xml", n), &slide.to_xml()?)?;
            part(&format!("ppt/slides/_rels/slide{}.xml.rels", n), &slide.rels_xml()?)?;
        }

        let writer = zip.finish()?;
        tracing::debug!(slides = count, "presentation package written");
        Ok(writer)
    }
}
