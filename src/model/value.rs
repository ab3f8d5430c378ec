//! Scalar cell values.

use crate::format::number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar drawn from a table cell.
///
/// The plain string form (`Display`) is what the formatter falls back to when a
/// format specification cannot be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer-like value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Infer a value from raw text: integer, then float, then text.
    ///
    /// Surrounding whitespace is ignored for the numeric attempts but kept
    /// when the value falls through to text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if !trimmed.is_empty() && looks_numeric(trimmed) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Value::Float(f);
            }
        }
        Value::Text(raw.to_string())
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "str",
        }
    }

    /// Whether this is an integer-like value.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Whether this is a numeric value.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of the value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Round to `ndigits` decimal places (negative rounds left of the point).
    ///
    /// Integers stay integers. Text is returned unchanged, as is an integer whose
    /// rounded value would not fit in `i64`.
    pub fn round(&self, ndigits: i32) -> Value {
        match self {
            Value::Int(i) => Value::Int(number::round_int(*i, ndigits).unwrap_or(*i)),
            Value::Float(f) => Value::Float(number::round_float(*f, ndigits)),
            Value::Text(s) => Value::Text(s.clone()),
        }
    }
}

/// Reject strings `f64::from_str` accepts but a data column should keep as text.
fn looks_numeric(s: &str) -> bool {
    let body = s.trim_start_matches(['+', '-']);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || body.eq_ignore_ascii_case("nan")
        || body.eq_ignore_ascii_case("inf")
        || body.eq_ignore_ascii_case("infinity")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&number::float_repr(*x)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer() {
        assert_eq!(Value::infer("42"), Value::Int(42));
        assert_eq!(Value::infer(" -7 "), Value::Int(-7));
        assert_eq!(Value::infer("3.5"), Value::Float(3.5));
        assert_eq!(Value::infer(".5"), Value::Float(0.5));
        assert_eq!(Value::infer("1e3"), Value::Float(1000.0));
        assert_eq!(Value::infer("North"), Value::Text("North".to_string()));
        assert_eq!(Value::infer(""), Value::Text(String::new()));
        assert_eq!(Value::infer("e5"), Value::Text("e5".to_string()));
    }

    #[test]
    fn test_display_plain_form() {
        assert_eq!(Value::Int(1234).to_string(), "1234");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(0.1).to_string(), "0.1");
        assert_eq!(Value::Float(1e16).to_string(), "1e+16");
        assert_eq!(Value::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Value::Text("abc".into()).to_string(), "abc");
    }

    #[test]
    fn test_round() {
        assert_eq!(Value::Int(1234).round(-2), Value::Int(1200));
        assert_eq!(Value::Int(1250).round(-2), Value::Int(1200));
        assert_eq!(Value::Int(1350).round(-2), Value::Int(1400));
        assert_eq!(Value::Float(2.675).round(2), Value::Float(2.67));
        assert_eq!(Value::from("x").round(1), Value::from("x"));
    }

    #[test]
    fn test_serde_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[1, 2.5, "a"]"#).unwrap();
        assert_eq!(
            values,
            vec![Value::Int(1), Value::Float(2.5), Value::Text("a".into())]
        );
    }
}
