//! Options for table insertion and slide titles.

use crate::units::Length;
use serde::{Deserialize, Serialize};

/// Position or size used when none is given (4 cm).
pub const DEFAULT_OFFSET_CM: f64 = 4.0;

/// Default table font size in points.
pub const DEFAULT_TABLE_FONT_SIZE: f64 = 14.0;

/// Default title font size in points.
pub const DEFAULT_TITLE_FONT_SIZE: f64 = 16.0;

fn or_default_offset(length: Option<Length>) -> Length {
    length.unwrap_or_else(|| Length::cm(DEFAULT_OFFSET_CM))
}

/// Options for [`df_to_table`](crate::df_to_table).
///
/// Every field is optional in serialized form, so an options file only needs
/// the settings it changes:
///
/// ```
/// use pptable::TableOptions;
///
/// let options: TableOptions = serde_json::from_str(r#"{
///     "left": "2cm",
///     "col_formatters": ["", ",", ".2"],
///     "transposed": true
/// }"#)?;
/// assert!(options.transposed);
/// assert_eq!(options.font_size, 14.0);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Left edge; 4 cm when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,

    /// Top edge; 4 cm when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,

    /// Total width; 4 cm when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,

    /// Total height; 4 cm when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,

    /// Header labels replacing the frame's column names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colnames: Option<Vec<String>>,

    /// Row labels replacing the frame's index (transposed layout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rownames: Option<Vec<String>>,

    /// One format specification per column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_formatters: Option<Vec<String>>,

    /// Per-column rounding `k`: numbers are rounded to `-k` decimal places
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounding: Option<Vec<Option<i32>>>,

    /// Shape name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Leave cells unstyled so the table style shows through
    pub white_background: bool,

    /// Lay records out as columns with a label column on the left
    pub transposed: bool,

    /// Cell font size in points
    pub font_size: f64,

    /// Width overrides for the leading grid columns
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub col_widths: Vec<Length>,

    /// Height overrides for the leading grid rows
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_heights: Vec<Length>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            left: None,
            top: None,
            width: None,
            height: None,
            colnames: None,
            rownames: None,
            col_formatters: None,
            rounding: None,
            name: None,
            white_background: false,
            transposed: false,
            font_size: DEFAULT_TABLE_FONT_SIZE,
            col_widths: Vec::new(),
            row_heights: Vec::new(),
        }
    }
}

impl TableOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top-left corner.
    pub fn with_position(mut self, left: Length, top: Length) -> Self {
        self.left = Some(left);
        self.top = Some(top);
        self
    }

    /// Set the overall size.
    pub fn with_size(mut self, width: Length, height: Length) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Override the header labels.
    pub fn with_colnames<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.colnames = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Override the row labels.
    pub fn with_rownames<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.rownames = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set one format specification per column.
    pub fn with_col_formatters<S: Into<String>>(mut self, specs: impl IntoIterator<Item = S>) -> Self {
        self.col_formatters = Some(specs.into_iter().map(Into::into).collect());
        self
    }

    /// Set per-column rounding directives.
    pub fn with_rounding(mut self, rounding: impl IntoIterator<Item = Option<i32>>) -> Self {
        self.rounding = Some(rounding.into_iter().collect());
        self
    }

    /// Name the inserted shape.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Skip the default cell styling.
    pub fn with_white_background(mut self, white: bool) -> Self {
        self.white_background = white;
        self
    }

    /// Use the transposed layout.
    pub fn with_transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    /// Set the cell font size in points.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Override leading column widths.
    pub fn with_col_widths(mut self, widths: impl IntoIterator<Item = Length>) -> Self {
        self.col_widths = widths.into_iter().collect();
        self
    }

    /// Override leading row heights.
    pub fn with_row_heights(mut self, heights: impl IntoIterator<Item = Length>) -> Self {
        self.row_heights = heights.into_iter().collect();
        self
    }

    /// `(left, top, width, height)` with defaults filled in.
    pub fn frame(&self) -> (Length, Length, Length, Length) {
        (
            or_default_offset(self.left),
            or_default_offset(self.top),
            or_default_offset(self.width),
            or_default_offset(self.height),
        )
    }
}

/// Options for [`add_title`](crate::add_title).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleOptions {
    /// Title text
    pub text: String,

    /// Left edge; 4 cm when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,

    /// Top edge; 4 cm when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,

    /// Width; 4 cm when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,

    /// Height; 4 cm when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,

    /// Bold
    pub bold: bool,

    /// Underlined
    pub underline: bool,

    /// Italic
    pub italic: bool,

    /// Font size in points
    pub font_size: f64,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            left: None,
            top: None,
            width: None,
            height: None,
            bold: true,
            underline: true,
            italic: false,
            font_size: DEFAULT_TITLE_FONT_SIZE,
        }
    }
}

impl TitleOptions {
    /// Title options for `text` with default formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the top-left corner.
    pub fn with_position(mut self, left: Length, top: Length) -> Self {
        self.left = Some(left);
        self.top = Some(top);
        self
    }

    /// Set the text box size.
    pub fn with_size(mut self, width: Length, height: Length) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set bold.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set underline.
    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Set italic.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set the font size in points.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// `(left, top, width, height)` with defaults filled in.
    pub fn frame(&self) -> (Length, Length, Length, Length) {
        (
            or_default_offset(self.left),
            or_default_offset(self.top),
            or_default_offset(self.width),
            or_default_offset(self.height),
        )
    }

    /// Fill the unset geometry so the title spans the width of `table` in a
    /// band directly above it.
    ///
    /// The band is 1 cm high unless a height is set, and its top is clamped to
    /// the slide edge.
    pub fn above(mut self, table: &TableOptions) -> Self {
        let (left, top, width, _) = table.frame();
        let height = self.height.unwrap_or_else(|| Length::cm(1.0));
        self.left.get_or_insert(left);
        self.top.get_or_insert(Length::emu((top.to_emu() - height.to_emu()).max(0)));
        self.width.get_or_insert(width);
        self.height = Some(height);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_defaults() {
        let options = TableOptions::default();
        let four = Length::cm(4.0);
        assert_eq!(options.frame(), (four, four, four, four));
        assert_eq!(options.font_size, 14.0);
        assert!(!options.transposed);
        assert!(!options.white_background);
    }

    #[test]
    fn test_table_builder() {
        let options = TableOptions::new()
            .with_position(Length::cm(1.0), Length::cm(2.0))
            .with_colnames(["A", "B"])
            .with_col_formatters([",", ".2"])
            .with_rounding([None, Some(2)])
            .with_name("Sales")
            .with_transposed(true)
            .with_font_size(11.0);
        assert_eq!(options.frame().0, Length::cm(1.0));
        assert_eq!(options.frame().2, Length::cm(4.0));
        assert_eq!(options.colnames, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(options.rounding, Some(vec![None, Some(2)]));
        assert_eq!(options.name.as_deref(), Some("Sales"));
        assert_eq!(options.font_size, 11.0);
    }

    #[test]
    fn test_table_options_json() {
        let options: TableOptions = serde_json::from_str(
            r#"{"width": "10cm", "col_widths": ["3cm", 1080000], "white_background": true}"#,
        )
        .unwrap();
        assert_eq!(options.width, Some(Length::cm(10.0)));
        assert_eq!(options.col_widths, vec![Length::cm(3.0), Length::cm(3.0)]);
        assert!(options.white_background);

        let json = serde_json::to_string(&TableOptions::default()).unwrap();
        assert!(!json.contains("colnames"));
        let back: TableOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TableOptions::default());
    }

    #[test]
    fn test_title_defaults() {
        let title = TitleOptions::new("Revenue");
        assert_eq!(title.text, "Revenue");
        assert!(title.bold);
        assert!(title.underline);
        assert!(!title.italic);
        assert_eq!(title.font_size, 16.0);

        let parsed: TitleOptions = serde_json::from_str(r#"{"text": "X", "underline": false}"#).unwrap();
        assert!(!parsed.underline);
        assert!(parsed.bold);
    }

    #[test]
    fn test_title_above_table() {
        let table = TableOptions::new().with_position(Length::cm(2.0), Length::cm(5.0));
        let title = TitleOptions::new("Sales").above(&table);
        assert_eq!(
            title.frame(),
            (Length::cm(2.0), Length::cm(4.0), Length::cm(4.0), Length::cm(1.0))
        );

        let defaults = TitleOptions::new("Sales").above(&TableOptions::default());
        let (_, top, _, height) = defaults.frame();
        assert_eq!(top.to_emu() + height.to_emu(), Length::cm(4.0).to_emu());
    }

    #[test]
    fn test_title_above_keeps_explicit_geometry() {
        let table = TableOptions::new().with_position(Length::cm(2.0), Length::cm(0.5));
        let title = TitleOptions::new("Sales")
            .with_size(Length::cm(6.0), Length::cm(2.0))
            .above(&table);
        assert_eq!(title.left, Some(Length::cm(2.0)));
        assert_eq!(title.top, Some(Length::ZERO));
        assert_eq!(title.width, Some(Length::cm(6.0)));
        assert_eq!(title.height, Some(Length::cm(2.0)));

        let placed = TitleOptions::new("Sales")
            .with_position(Length::cm(1.0), Length::cm(9.0))
            .above(&table);
        assert_eq!(placed.left, Some(Length::cm(1.0)));
        assert_eq!(placed.top, Some(Length::cm(9.0)));
    }
}
