//! ZIP container access for reading OOXML packages back.

use crate::error::{Error, Result};
use crate::model::Metadata;
use quick_xml::events::Event;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Map from relationship ID to relationship data
    pub by_id: HashMap<String, Relationship>,
    /// Map from relationship type to list of relationships
    pub by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Get relationships whose type URI ends with `/{kind}`.
    pub fn get_by_kind(&self, kind: &str) -> Vec<&Relationship> {
        self.by_type
            .iter()
            .filter(|(t, _)| t.rsplit('/').next() == Some(kind))
            .flat_map(|(_, rels)| rels.iter())
            .collect()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel.clone());
        self.by_id.insert(rel.id.clone(), rel);
    }
}

/// Decode XML bytes, honouring a UTF-8 or UTF-16 byte order mark.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let invalid = |e: std::string::FromUtf8Error| {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    };
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec()).map_err(invalid),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes).map(utf8_declaration),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes).map(utf8_declaration),
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Rewrite a UTF-16 encoding declaration once the content is already UTF-8.
fn utf8_declaration(content: String) -> String {
    match content.find("?>") {
        Some(end) if content.starts_with("<?xml") => {
            let decl = content[..end]
                .replace("UTF-16", "UTF-8")
                .replace("utf-16", "UTF-8");
            format!("{}{}", decl, &content[end..])
        }
        _ => content,
    }
}

/// OOXML container over a ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open a container from a file path.
    ///
    /// ```no_run
    /// use pptable::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("report.pptx")?;
    /// assert!(container.exists("ppt/presentation.xml"));
    /// # Ok::<(), pptable::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create a container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_xml_bytes(&bytes)
    }

    /// Check if a part exists.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all parts.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// List parts whose name starts with `prefix`.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| n.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    /// Read the relationships of `part_path` (`""` for the package).
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = match part_path.rsplit_once('/') {
            _ if part_path.is_empty() || part_path == "/" => "_rels/.rels".to_string(),
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None => format!("_rels/{}.rels", part_path),
        };
        self.parse_relationships(&rels_path)
    }

    /// Read `docProps/core.xml` and `docProps/app.xml`.
    ///
    /// Missing parts leave the corresponding fields unset.
    pub fn parse_metadata(&self) -> Result<Metadata> {
        let mut meta = Metadata::default();

        if let Ok(xml) = self.read_xml("docProps/core.xml") {
            for (element, text) in leaf_texts(&xml)? {
                match element.as_str() {
                    "title" => meta.title = Some(text),
                    "creator" => meta.author = Some(text),
                    _ => {}
                }
            }
        }
        if let Ok(xml) = self.read_xml("docProps/app.xml") {
            for (element, text) in leaf_texts(&xml)? {
                match element.as_str() {
                    "Application" => meta.application = Some(text),
                    "Slides" => meta.slide_count = text.trim().parse().ok(),
                    _ => {}
                }
            }
        }

        Ok(meta)
    }

    fn parse_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let content = match self.read_xml(rels_path) {
            Ok(c) => c,
            Err(_) => return Ok(Relationships::new()),
        };

        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                        external: false,
                    };
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Id" => rel.id = value,
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"TargetMode" => rel.external = value.eq_ignore_ascii_case("external"),
                            _ => {}
                        }
                    }
                    if !rel.id.is_empty() {
                        rels.add(rel);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Resolve `relative` against the directory of `base`.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut parts: Vec<&str> = base.split('/').collect();
        parts.pop();
        for segment in relative.split('/') {
            match segment {
                ".." => {
                    parts.pop();
                }
                "." | "" => {}
                s => parts.push(s),
            }
        }
        parts.join("/")
    }
}

/// `(local element name, text)` for every element holding text directly.
fn leaf_texts(xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut out = Vec::new();
    let mut current: Option<String> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                current = Some(String::from_utf8_lossy(e.name().local_name().as_ref()).to_string());
            }
            Ok(Event::Text(e)) => {
                if let Some(ref element) = current {
                    let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    out.push((element.clone(), text.into_owned()));
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
    }

    #[test]
    fn test_relationships_by_kind() {
        let mut rels = Relationships::new();
        for (id, kind) in [("rId1", "slideMaster"), ("rId6", "slide"), ("rId7", "slide")] {
            rels.add(Relationship {
                id: id.to_string(),
                rel_type: format!(
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/{}",
                    kind
                ),
                target: format!("{}.xml", id),
                external: false,
            });
        }

        assert!(rels.get("rId1").is_some());
        assert!(rels.get("rId3").is_none());
        assert_eq!(rels.get_by_kind("slide").len(), 2);
        assert_eq!(rels.get_by_kind("slideMaster").len(), 1);
    }

    #[test]
    fn test_decode_xml_bytes() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        assert_eq!(decode_xml_bytes(b"\xEF\xBB\xBF<a/>").unwrap(), "<a/>");
        assert_eq!(decode_xml_bytes(b"<a/>").unwrap(), "<a/>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let decl = utf8_declaration(r#"<?xml version="1.0" encoding="UTF-16"?><a/>"#.to_string());
        assert_eq!(decl, r#"<?xml version="1.0" encoding="UTF-8"?><a/>"#);
    }

    #[test]
    fn test_missing_part() {
        let bytes = crate::pptx::Presentation::new().to_bytes().unwrap();
        let container = OoxmlContainer::from_bytes(bytes).unwrap();
        assert!(container.exists("[Content_Types].xml"));
        assert!(matches!(
            container.read_xml("ppt/slides/slide1.xml"),
            Err(Error::MissingComponent(_))
        ));
        let rels = container.read_relationships("ppt/presentation.xml").unwrap();
        assert_eq!(rels.get_by_kind("slideMaster").len(), 1);
        assert!(container.list_files_with_prefix("ppt/slideLayouts/").len() >= 2);
    }
}
