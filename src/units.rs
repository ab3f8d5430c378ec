//! Lengths in English Metric Units.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;
/// EMU per centimetre.
pub const EMU_PER_CM: i64 = 360_000;
/// EMU per point.
pub const EMU_PER_PT: i64 = 12_700;

/// A length stored as EMU (914400 per inch).
///
/// Serializes as a raw EMU integer; deserializes from either an EMU integer
/// or a unit string such as `"4cm"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Length(i64);

impl Length {
    /// Zero length.
    pub const ZERO: Length = Length(0);

    /// From raw EMU.
    pub const fn emu(emu: i64) -> Self {
        Length(emu)
    }

    /// From centimetres.
    pub fn cm(cm: f64) -> Self {
        Length((cm * EMU_PER_CM as f64).round() as i64)
    }

    /// From inches.
    pub fn inches(inches: f64) -> Self {
        Length((inches * EMU_PER_INCH as f64).round() as i64)
    }

    /// From points.
    pub fn pt(pt: f64) -> Self {
        Length((pt * EMU_PER_PT as f64).round() as i64)
    }

    /// Raw EMU value.
    pub const fn to_emu(self) -> i64 {
        self.0
    }

    /// Value in centimetres.
    pub fn to_cm(self) -> f64 {
        self.0 as f64 / EMU_PER_CM as f64
    }

    /// Value in inches.
    pub fn to_inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }

    /// Value in points.
    pub fn to_pt(self) -> f64 {
        self.0 as f64 / EMU_PER_PT as f64
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parse `4cm`, `1.5in`, `12pt`, `914400emu`; a bare number is centimetres.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic() || c == '"')
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let number = number.trim();

        if unit.eq_ignore_ascii_case("emu") {
            return number
                .parse::<i64>()
                .map(Length::emu)
                .map_err(|_| Error::InvalidLength(s.to_string()));
        }

        let value: f64 = number
            .parse()
            .map_err(|_| Error::InvalidLength(s.to_string()))?;
        if !value.is_finite() {
            return Err(Error::InvalidLength(s.to_string()));
        }

        match unit.to_ascii_lowercase().as_str() {
            "" | "cm" => Ok(Length::cm(value)),
            "mm" => Ok(Length::cm(value / 10.0)),
            "in" | "\"" => Ok(Length::inches(value)),
            "pt" => Ok(Length::pt(value)),
            _ => Err(Error::InvalidLength(s.to_string())),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}emu", self.0)
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Emu(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Emu(emu) => Ok(Length(emu)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl From<i64> for Length {
    fn from(emu: i64) -> Self {
        Length(emu)
    }
}
