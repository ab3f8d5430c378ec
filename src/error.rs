//! Error types for the pptable library.

use std::io;
use thiserror::Error;

/// Result type alias for pptable operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, writing or reading presentations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Error producing XML content.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// An index-addressed list was shorter than the requested position.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// What was being addressed (e.g. "column", "row name").
        what: &'static str,
        /// Requested index.
        index: usize,
        /// Number of available slots.
        len: usize,
    },

    /// A data row does not match the frame's column count.
    #[error("Row {row} has {found} values, expected {expected}")]
    ShapeMismatch {
        /// Zero-based row number.
        row: usize,
        /// Number of columns in the frame.
        expected: usize,
        /// Number of values in the offending row.
        found: usize,
    },

    /// A length string could not be parsed.
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// Error reading CSV input.
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error reading or writing JSON.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::XmlWrite(err.to_string())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}
