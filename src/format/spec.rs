//! Format specification mini-language.
//!
//! `[[fill]align][sign][#][0][width][grouping][.precision][type]`
//!
//! | Field | Values |
//! |-------|--------|
//! | align | `<` left, `>` right, `^` centre, `=` pad after sign |
//! | sign | `+`, `-`, space |
//! | grouping | `,` or `_` |
//! | type | `b c d o x X n e E f F g G % s` |

use super::number;
use crate::model::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing or applying a format specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The specification has trailing characters after the type.
    #[error("Invalid format specifier '{0}'")]
    InvalidSpec(String),

    /// A `.` was not followed by digits.
    #[error("Format specifier missing precision")]
    MissingPrecision,

    /// The presentation type does not apply to this value's type.
    #[error("Unknown format code '{code}' for object of type '{kind}'")]
    UnknownCode {
        /// Presentation type character
        code: char,
        /// Value type name
        kind: &'static str,
    },

    /// Precision given for an integer presentation type.
    #[error("Precision not allowed in integer format specifier")]
    PrecisionNotAllowed,

    /// Sign given for a string or `c` presentation.
    #[error("Sign not allowed with format code '{0}'")]
    SignNotAllowed(char),

    /// `#` given for a string.
    #[error("Alternate form (#) not allowed in string format specifier")]
    AlternateNotAllowed,

    /// `=` alignment given for a string.
    #[error("'=' alignment not allowed in string format specifier")]
    AlignNotAllowed,

    /// Grouping combined with a presentation type that does not support it.
    #[error("Cannot specify '{grouping}' with '{code}'")]
    GroupingNotAllowed {
        /// Grouping character
        grouping: char,
        /// Presentation type character
        code: char,
    },

    /// Both `,` and `_` given.
    #[error("Cannot specify both ',' and '_'")]
    ConflictingGrouping,

    /// `c` given an integer outside the Unicode range.
    #[error("%c arg not in range(0x110000)")]
    CharOutOfRange,

    /// A rounding spec (`.NR`) without a digit count.
    #[error("Rounding specifier '{0}' has no digit count")]
    MissingRoundingDigits(String),

    /// A rounded value no longer fits the integer type.
    #[error("Rounded value out of range")]
    Overflow,

    /// Width or precision above [`MAX_FIELD`].
    #[error("Too many decimal digits in format string")]
    FieldTooLarge,
}

/// Largest accepted field width or precision.
pub const MAX_FIELD: usize = 10_000;

/// Horizontal alignment inside the field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `<`
    Left,
    /// `>`
    Right,
    /// `^`
    Center,
    /// `=`: padding goes between the sign and the digits
    AfterSign,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        }
    }
}

/// Sign display for numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sign {
    /// Only negative numbers get a sign
    #[default]
    Minus,
    /// Always show a sign
    Plus,
    /// Leading space for non-negative numbers
    Space,
}

/// A parsed format specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// Explicit padding character
    pub fill: Option<char>,
    /// Explicit alignment
    pub align: Option<Align>,
    /// Explicit sign option
    pub sign: Option<Sign>,
    /// `#`: radix prefix, or keep the decimal point
    pub alternate: bool,
    /// `0`: sign-aware zero padding
    pub zero_pad: bool,
    /// Minimum field width in characters
    pub width: Option<usize>,
    /// Thousands separator
    pub grouping: Option<char>,
    /// Fractional digits, significant digits, or maximum string length
    pub precision: Option<usize>,
    /// Presentation type
    pub kind: Option<char>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: None,
            align: None,
            sign: None,
            alternate: false,
            zero_pad: false,
            width: None,
            grouping: None,
            precision: None,
            kind: None,
        }
    }
}

const KINDS: &str = "bcdoxXneEfFgG%s";

impl FormatSpec {
    /// Parse a specification string.
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        let chars: Vec<char> = spec.chars().collect();
        let mut out = FormatSpec::default();
        let mut pos = 0;

        if let Some(align) = chars.get(1).copied().and_then(Align::from_char) {
            out.fill = Some(chars[0]);
            out.align = Some(align);
            pos = 2;
        } else if let Some(align) = chars.first().copied().and_then(Align::from_char) {
            out.align = Some(align);
            pos = 1;
        }

        out.sign = match chars.get(pos) {
            Some('+') => Some(Sign::Plus),
            Some('-') => Some(Sign::Minus),
            Some(' ') => Some(Sign::Space),
            _ => None,
        };
        if out.sign.is_some() {
            pos += 1;
        }

        if chars.get(pos) == Some(&'#') {
            out.alternate = true;
            pos += 1;
        }

        if chars.get(pos) == Some(&'0') {
            out.zero_pad = true;
            pos += 1;
        }

        out.width = take_number(&chars, &mut pos)?;

        match chars.get(pos) {
            Some(&g @ (',' | '_')) => {
                out.grouping = Some(g);
                pos += 1;
                if matches!(chars.get(pos), Some(',' | '_')) {
                    return Err(FormatError::ConflictingGrouping);
                }
            }
            _ => {}
        }

        if chars.get(pos) == Some(&'.') {
            pos += 1;
            out.precision = Some(take_number(&chars, &mut pos)?.ok_or(FormatError::MissingPrecision)?);
        }

        match &chars[pos..] {
            [] => {}
            [kind] if KINDS.contains(*kind) => out.kind = Some(*kind),
            _ => return Err(FormatError::InvalidSpec(spec.to_string())),
        }

        Ok(out)
    }

    /// Render `value` according to this specification.
    pub fn apply(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Int(i) => self.apply_int(*i),
            Value::Float(f) => self.apply_float(*f),
            Value::Text(s) => self.apply_text(s),
        }
    }

    fn apply_int(&self, value: i64) -> Result<String, FormatError> {
        let code = self.kind.unwrap_or('d');
        let magnitude = value.unsigned_abs();

        let body = match code {
            'e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%' => return self.apply_float(value as f64),
            's' => {
                return Err(FormatError::UnknownCode {
                    code,
                    kind: "int",
                })
            }
            _ if self.precision.is_some() => return Err(FormatError::PrecisionNotAllowed),
            'd' => magnitude.to_string(),
            'n' => {
                if let Some(grouping) = self.grouping {
                    return Err(FormatError::GroupingNotAllowed { grouping, code });
                }
                magnitude.to_string()
            }
            'b' => format!("{:b}", magnitude),
            'o' => format!("{:o}", magnitude),
            'x' => format!("{:x}", magnitude),
            'X' => format!("{:X}", magnitude),
            'c' => {
                if self.sign.is_some() {
                    return Err(FormatError::SignNotAllowed(code));
                }
                if let Some(grouping) = self.grouping {
                    return Err(FormatError::GroupingNotAllowed { grouping, code });
                }
                let c = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(FormatError::CharOutOfRange)?;
                return Ok(self.pad(String::new(), c.to_string(), Align::Right));
            }
            other => {
                return Err(FormatError::UnknownCode {
                    code: other,
                    kind: "int",
                })
            }
        };

        let body = match (self.grouping, code) {
            (Some(g), 'd') => number::group_digits(&body, g, 3, is_decimal),
            (Some('_'), 'b' | 'o' | 'x' | 'X') => number::group_digits(&body, '_', 4, is_hex),
            (Some(grouping), 'b' | 'o' | 'x' | 'X') => {
                return Err(FormatError::GroupingNotAllowed { grouping, code })
            }
            _ => body,
        };

        let prefix = match (self.alternate, code) {
            (true, 'b') => "0b",
            (true, 'o') => "0o",
            (true, 'x') => "0x",
            (true, 'X') => "0X",
            _ => "",
        };

        let sign = self.sign_str(value < 0);
        Ok(self.pad(format!("{}{}", sign, prefix), body, Align::Right))
    }

    fn apply_float(&self, value: f64) -> Result<String, FormatError> {
        let code = match self.kind {
            Some(code @ ('d' | 'b' | 'o' | 'x' | 'X' | 'c' | 's')) => {
                return Err(FormatError::UnknownCode {
                    code,
                    kind: "float",
                })
            }
            other => other,
        };
        if let (Some(grouping), Some('n')) = (self.grouping, code) {
            return Err(FormatError::GroupingNotAllowed {
                grouping,
                code: 'n',
            });
        }

        let upper = matches!(code, Some('E' | 'F' | 'G'));
        let magnitude = value.abs();

        let body = if value.is_nan() {
            special("nan", upper, code)
        } else if value.is_infinite() {
            special("inf", upper, code)
        } else {
            let precision = self.precision;
            let mut body = match code {
                None => match precision {
                    None => number::repr_magnitude(magnitude),
                    Some(p) => number::general(magnitude, p, false, self.alternate, true),
                },
                Some('f' | 'F') => number::fixed(magnitude, precision.unwrap_or(6)),
                Some('e' | 'E') => number::scientific(magnitude, precision.unwrap_or(6), upper),
                Some('g' | 'G' | 'n') => {
                    number::general(magnitude, precision.unwrap_or(6), upper, self.alternate, false)
                }
                Some('%') => number::fixed(magnitude * 100.0, precision.unwrap_or(6)) + "%",
                Some(other) => {
                    return Err(FormatError::UnknownCode {
                        code: other,
                        kind: "float",
                    })
                }
            };
            if self.alternate && matches!(code, Some('f' | 'F' | 'e' | 'E' | '%')) && !body.contains('.') {
                let at = body.find(['e', 'E', '%']).unwrap_or(body.len());
                body.insert(at, '.');
            }
            match self.grouping {
                Some(g) => number::group_digits(&body, g, 3, is_decimal),
                None => body,
            }
        };

        let sign = self.sign_str(value.is_sign_negative() && !value.is_nan());
        Ok(self.pad(sign.to_string(), body, Align::Right))
    }

    fn apply_text(&self, value: &str) -> Result<String, FormatError> {
        if let Some(code @ ('b' | 'c' | 'd' | 'o' | 'x' | 'X' | 'n' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%')) = self.kind {
            return Err(FormatError::UnknownCode { code, kind: "str" });
        }
        if self.sign.is_some() {
            return Err(FormatError::SignNotAllowed('s'));
        }
        if self.alternate {
            return Err(FormatError::AlternateNotAllowed);
        }
        if let Some(grouping) = self.grouping {
            return Err(FormatError::GroupingNotAllowed { grouping, code: 's' });
        }
        if self.align == Some(Align::AfterSign) {
            return Err(FormatError::AlignNotAllowed);
        }

        let body: String = match self.precision {
            Some(p) => value.chars().take(p).collect(),
            None => value.to_string(),
        };
        Ok(self.pad(String::new(), body, Align::Left))
    }

    fn sign_str(&self, negative: bool) -> &'static str {
        match (negative, self.sign.unwrap_or_default()) {
            (true, _) => "-",
            (false, Sign::Plus) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::Minus) => "",
        }
    }

    /// Pad `prefix + body` to the field width.
    ///
    /// The `0` flag makes `0` the fill unless one is given, and numbers then
    /// pad after the sign.
    fn pad(&self, prefix: String, body: String, default_align: Align) -> String {
        let fill = match (self.fill, self.zero_pad) {
            (Some(fill), _) => fill,
            (None, true) => '0',
            (None, false) => ' ',
        };
        let align = match self.align {
            Some(align) => align,
            None if self.zero_pad && default_align == Align::Right => Align::AfterSign,
            None => default_align,
        };

        let width = self.width.unwrap_or(0);
        let body = match self.grouping {
            Some(sep) if fill == '0' && align == Align::AfterSign => {
                self.zero_fill_grouped(&body, sep, width.saturating_sub(prefix.chars().count()))
            }
            _ => body,
        };

        let len = prefix.chars().count() + body.chars().count();
        if len >= width {
            return prefix + &body;
        }

        let padding = width - len;
        let fill_str = |n: usize| std::iter::repeat(fill).take(n).collect::<String>();
        match align {
            Align::Left => prefix + &body + &fill_str(padding),
            Align::Right => fill_str(padding) + &prefix + &body,
            Align::Center => {
                let left = padding / 2;
                fill_str(left) + &prefix + &body + &fill_str(padding - left)
            }
            Align::AfterSign => prefix + &fill_str(padding) + &body,
        }
    }

    /// Widen the grouped digits of `body` with leading zeros until it is at
    /// least `target` characters, so separators also fall in the padding.
    fn zero_fill_grouped(&self, body: &str, sep: char, target: usize) -> String {
        let (size, is_digit): (usize, fn(char) -> bool) = match self.kind {
            Some('b' | 'o' | 'x' | 'X') => (4, is_hex),
            _ => (3, is_decimal),
        };
        let end = body.find(|c: char| c != sep && !is_digit(c)).unwrap_or(body.len());
        let (grouped, rest) = body.split_at(end);
        let digits: String = grouped.chars().filter(|&c| c != sep).collect();
        if digits.is_empty() {
            return body.to_string();
        }

        let rest_len = rest.chars().count();
        let mut count = digits.len();
        while count + (count - 1) / size + rest_len < target {
            count += 1;
        }
        let padded = "0".repeat(count - digits.len()) + &digits;
        number::group_digits(&padded, sep, size, is_digit) + rest
    }
}

fn special(word: &str, upper: bool, code: Option<char>) -> String {
    let word = if upper {
        word.to_uppercase()
    } else {
        word.to_string()
    };
    if code == Some('%') {
        word + "%"
    } else {
        word
    }
}

fn is_decimal(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn take_number(chars: &[char], pos: &mut usize) -> Result<Option<usize>, FormatError> {
    let start = *pos;
    while chars.get(*pos).is_some_and(|c| c.is_ascii_digit()) {
        *pos += 1;
    }
    if *pos == start {
        return Ok(None);
    }
    match chars[start..*pos].iter().collect::<String>().parse::<usize>() {
        Ok(n) if n <= MAX_FIELD => Ok(Some(n)),
        _ => Err(FormatError::FieldTooLarge),
    }
}

impl FromStr for FormatSpec {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(align) = self.align {
            let c = match align {
                Align::Left => '<',
                Align::Right => '>',
                Align::Center => '^',
                Align::AfterSign => '=',
            };
            if let Some(fill) = self.fill {
                write!(f, "{}", fill)?;
            }
            write!(f, "{}", c)?;
        }
        match self.sign {
            Some(Sign::Plus) => f.write_str("+")?,
            Some(Sign::Minus) => f.write_str("-")?,
            Some(Sign::Space) => f.write_str(" ")?,
            None => {}
        }
        if self.alternate {
            f.write_str("#")?;
        }
        if self.zero_pad {
            f.write_str("0")?;
        }
        if let Some(width) = self.width {
            write!(f, "{}", width)?;
        }
        if let Some(g) = self.grouping {
            write!(f, "{}", g)?;
        }
        if let Some(p) = self.precision {
            write!(f, ".{}", p)?;
        }
        if let Some(k) = self.kind {
            write!(f, "{}", k)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: impl Into<Value>, spec: &str) -> Result<String, FormatError> {
        FormatSpec::parse(spec)?.apply(&value.into())
    }

    #[test]
    fn test_parse_fields() {
        let spec = FormatSpec::parse("*^+#012,.3f").unwrap();
        assert_eq!(spec.fill, Some('*'));
        assert_eq!(spec.align, Some(Align::Center));
        assert_eq!(spec.sign, Some(Sign::Plus));
        assert!(spec.alternate);
        assert!(spec.zero_pad);
        assert_eq!(spec.width, Some(12));
        assert_eq!(spec.grouping, Some(','));
        assert_eq!(spec.precision, Some(3));
        assert_eq!(spec.kind, Some('f'));
        assert_eq!(spec.to_string(), "*^+#012,.3f");
        assert_eq!(FormatSpec::parse("<5").unwrap().to_string(), "<5");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            FormatSpec::parse(".2fG"),
            Err(FormatError::InvalidSpec(".2fG".to_string()))
        );
        assert_eq!(FormatSpec::parse(".f"), Err(FormatError::MissingPrecision));
        assert_eq!(FormatSpec::parse(",_"), Err(FormatError::ConflictingGrouping));
        assert!(FormatSpec::parse("q").is_err());
        assert!(FormatSpec::parse(".2RG").is_err());
        assert_eq!(FormatSpec::parse("99999999999999"), Err(FormatError::FieldTooLarge));
        assert_eq!(FormatSpec::parse(".10001f"), Err(FormatError::FieldTooLarge));
        assert_eq!(
            FormatSpec::parse("999999999999999999999999"),
            Err(FormatError::FieldTooLarge)
        );
        assert_eq!(FormatSpec::parse("10000").unwrap().width, Some(MAX_FIELD));
    }

    #[test]
    fn test_integers() {
        assert_eq!(fmt(1234567, ",").unwrap(), "1,234,567");
        assert_eq!(fmt(-1234567, ",").unwrap(), "-1,234,567");
        assert_eq!(fmt(1234567, "_").unwrap(), "1_234_567");
        assert_eq!(fmt(42, "").unwrap(), "42");
        assert_eq!(fmt(42, "+d").unwrap(), "+42");
        assert_eq!(fmt(42, "05").unwrap(), "00042");
        assert_eq!(fmt(-42, "05").unwrap(), "-0042");
        assert_eq!(fmt(42, "<5").unwrap(), "42   ");
        assert_eq!(fmt(42, "^6").unwrap(), "  42  ");
        assert_eq!(fmt(255, "#x").unwrap(), "0xff");
        assert_eq!(fmt(255, "08b").unwrap(), "11111111");
        assert_eq!(fmt(65535, "_x").unwrap(), "ffff");
        assert_eq!(fmt(1048575, "_X").unwrap(), "F_FFFF");
        assert_eq!(fmt(65, "c").unwrap(), "A");
    }

    #[test]
    fn test_integer_zero_fill() {
        assert_eq!(fmt(42, "<05").unwrap(), "42000");
        assert_eq!(fmt(42, "^06").unwrap(), "004200");
        assert_eq!(fmt(42, "x<05").unwrap(), "42xxx");
        assert_eq!(fmt(1234, "010,").unwrap(), "00,001,234");
        assert_eq!(fmt(1234, "08,").unwrap(), "0,001,234");
        assert_eq!(fmt(-1234, "010,").unwrap(), "-0,001,234");
        assert_eq!(fmt(1234, "0=10,").unwrap(), "00,001,234");
        assert_eq!(fmt(1234, "*=10,").unwrap(), "*****1,234");
        assert_eq!(fmt(1234, ">010,").unwrap(), "000001,234");
        assert_eq!(fmt(255, "#010_x").unwrap(), "0x000_00ff");
    }

    #[test]
    fn test_integer_as_float() {
        assert_eq!(fmt(1234, ".2f").unwrap(), "1234.00");
        assert_eq!(fmt(1200, ",G").unwrap(), "1,200");
        assert_eq!(fmt(1, "%").unwrap(), "100.000000%");
    }

    #[test]
    fn test_integer_errors() {
        assert_eq!(fmt(12, ".2"), Err(FormatError::PrecisionNotAllowed));
        assert_eq!(fmt(12, ".2d"), Err(FormatError::PrecisionNotAllowed));
        assert!(matches!(fmt(12, "s"), Err(FormatError::UnknownCode { .. })));
        assert!(matches!(fmt(12, ",x"), Err(FormatError::GroupingNotAllowed { .. })));
        assert_eq!(fmt(-1, "c"), Err(FormatError::CharOutOfRange));
    }

    #[test]
    fn test_floats() {
        assert_eq!(fmt(3.14159, "f").unwrap(), "3.141590");
        assert_eq!(fmt(3.14159, ".2f").unwrap(), "3.14");
        assert_eq!(fmt(1234567.891, ",.2f").unwrap(), "1,234,567.89");
        assert_eq!(fmt(3.14159, ".2G").unwrap(), "3.1");
        assert_eq!(fmt(1234.5, ".2G").unwrap(), "1.2E+03");
        assert_eq!(fmt(1234.5, ",").unwrap(), "1,234.5");
        assert_eq!(fmt(1234.5, ".2").unwrap(), "1.2e+03");
        assert_eq!(fmt(3.0, ".3").unwrap(), "3.0");
        assert_eq!(fmt(0.256, ".1%").unwrap(), "25.6%");
        assert_eq!(fmt(1.5, "e").unwrap(), "1.500000e+00");
        assert_eq!(fmt(-2.5, "+.1f").unwrap(), "-2.5");
        assert_eq!(fmt(2.5, " .1f").unwrap(), " 2.5");
        assert_eq!(fmt(-3.5, "=+8.2f").unwrap(), "-   3.50");
        assert_eq!(fmt(3.5, "08.2f").unwrap(), "00003.50");
        assert_eq!(fmt(2.0, "#.0f").unwrap(), "2.");
        assert_eq!(fmt(1234.5, "012,.2f").unwrap(), "0,001,234.50");
        assert_eq!(fmt(-1234.5, "012,.1f").unwrap(), "-0,001,234.5");
        assert_eq!(fmt(2.5, "<07.2f").unwrap(), "2.50000");
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(fmt(f64::NAN, "f").unwrap(), "nan");
        assert_eq!(fmt(f64::INFINITY, "F").unwrap(), "INF");
        assert_eq!(fmt(f64::NEG_INFINITY, ",.2f").unwrap(), "-inf");
    }

    #[test]
    fn test_float_errors() {
        assert!(matches!(fmt(1.5, "d"), Err(FormatError::UnknownCode { .. })));
        assert!(matches!(fmt(1.5, "s"), Err(FormatError::UnknownCode { .. })));
        assert!(matches!(fmt(1.5, ",n"), Err(FormatError::GroupingNotAllowed { .. })));
    }

    #[test]
    fn test_strings() {
        assert_eq!(fmt("abc", "").unwrap(), "abc");
        assert_eq!(fmt("abc", "s").unwrap(), "abc");
        assert_eq!(fmt("abc", ">5").unwrap(), "  abc");
        assert_eq!(fmt("abc", "*^7").unwrap(), "**abc**");
        assert_eq!(fmt("abcdef", ".3").unwrap(), "abc");
        assert_eq!(fmt("ab", "5").unwrap(), "ab   ");
    }

    #[test]
    fn test_string_errors() {
        assert!(matches!(fmt("abc", ","), Err(FormatError::GroupingNotAllowed { .. })));
        assert!(matches!(fmt("abc", "f"), Err(FormatError::UnknownCode { .. })));
        assert_eq!(fmt("abc", "+"), Err(FormatError::SignNotAllowed('s')));
        assert_eq!(fmt("abc", "=5"), Err(FormatError::AlignNotAllowed));
        assert!(fmt("abc", ".2G").is_err());
    }
}
