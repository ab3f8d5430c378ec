//! DrawingML text and cell styling.

use crate::error::{Error, Result};
use crate::units::Length;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as FmtWrite};
use std::str::FromStr;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Black.
    pub const BLACK: RgbColor = RgbColor(0, 0, 0);
    /// White.
    pub const WHITE: RgbColor = RgbColor(255, 255, 255);

    /// Create a colour from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor(r, g, b)
    }

    /// Upper-case `RRGGBB` hex as used by `a:srgbClr/@val`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for RgbColor {
    type Err = Error;

    /// Parse `RRGGBB` or `#RRGGBB`.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidData(format!("invalid colour '{}'", s)));
        }
        let component = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| Error::InvalidData(format!("invalid colour '{}'", s)))
        };
        Ok(RgbColor(component(0)?, component(2)?, component(4)?))
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Value of the `algn` attribute.
    pub fn algn(self) -> &'static str {
        match self {
            Alignment::Left => "l",
            Alignment::Center => "ctr",
            Alignment::Right => "r",
            Alignment::Justify => "just",
        }
    }
}

/// Text frame autofit behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSize {
    /// No autofit element
    #[default]
    None,
    /// Grow the shape to fit its text (`a:spAutoFit`)
    ShapeToFitText,
    /// Shrink the text to fit the shape (`a:normAutofit`)
    TextToFitShape,
}

/// Character properties for a run of text.
///
/// Unset fields are omitted so the theme / table style decides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Latin typeface name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Bold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Italic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// Single underline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    /// Solid text colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<RgbColor>,
}

impl Font {
    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Font::default()
    }

    /// Write an `a:rPr`-shaped element named `tag` (`a:rPr` or `a:endParaRPr`).
    pub(crate) fn write_xml(&self, xml: &mut String, tag: &str) -> Result<()> {
        write!(xml, r#"<{} lang="en-US""#, tag)?;
        if let Some(size) = self.size {
            write!(xml, r#" sz="{}""#, (size * 100.0).round() as u32)?;
        }
        if let Some(bold) = self.bold {
            write!(xml, r#" b="{}""#, bold as u8)?;
        }
        if let Some(italic) = self.italic {
            write!(xml, r#" i="{}""#, italic as u8)?;
        }
        if let Some(underline) = self.underline {
            write!(xml, r#" u="{}""#, if underline { "sng" } else { "none" })?;
        }
        xml.push_str(r#" dirty="0""#);

        if self.color.is_none() && self.name.is_none() {
            xml.push_str("/>");
            return Ok(());
        }
        xml.push('>');
        if let Some(color) = self.color {
            write_solid_fill(xml, color)?;
        }
        if let Some(ref name) = self.name {
            let name = escape_xml(name);
            write!(
                xml,
                r#"<a:latin typeface="{0}"/><a:cs typeface="{0}"/>"#,
                name
            )?;
        }
        write!(xml, "</{}>", tag)?;
        Ok(())
    }
}

/// Cell background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "color")]
pub enum Fill {
    /// Inherit from the table style
    #[default]
    Inherit,
    /// Explicitly transparent (`a:noFill`)
    Background,
    /// Solid colour
    Solid(RgbColor),
}

/// One cell border line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    /// Line width
    pub width: Length,
    /// Line colour
    pub color: RgbColor,
}

impl Border {
    /// A 1 pt black line.
    pub fn thin() -> Self {
        Self {
            width: Length::pt(1.0),
            color: RgbColor::BLACK,
        }
    }

    /// Write `a:lnL` / `a:lnR` / ... named `tag`.
    pub(crate) fn write_xml(&self, xml: &mut String, tag: &str) -> Result<()> {
        write!(
            xml,
            r#"<{} w="{}" cap="flat" cmpd="sng" algn="ctr">"#,
            tag,
            self.width.to_emu()
        )?;
        write_solid_fill(xml, self.color)?;
        xml.push_str(r#"<a:prstDash val="solid"/><a:round/>"#);
        xml.push_str(r#"<a:headEnd type="none" w="med" len="med"/><a:tailEnd type="none" w="med" len="med"/>"#);
        write!(xml, "</{}>", tag)?;
        Ok(())
    }
}

/// Borders on the four sides of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borders {
    /// `a:lnL`
    pub left: Option<Border>,
    /// `a:lnR`
    pub right: Option<Border>,
    /// `a:lnT`
    pub top: Option<Border>,
    /// `a:lnB`
    pub bottom: Option<Border>,
}

impl Borders {
    /// The same border on every side.
    pub fn all(border: Border) -> Self {
        Self {
            left: Some(border),
            right: Some(border),
            top: Some(border),
            bottom: Some(border),
        }
    }

    /// Whether no side is set.
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

/// `<a:solidFill><a:srgbClr val=".."/></a:solidFill>`
pub(crate) fn write_solid_fill(xml: &mut String, color: RgbColor) -> Result<()> {
    write!(
        xml,
        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
        color.to_hex()
    )?;
    Ok(())
}

/// Escape XML special characters.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab / newline are not legal XML 1.0.
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}
