//! Value formatting for table cells.
//!
//! [`format_value`] turns a [`Value`] and a format specification into display
//! text and never fails: anything that cannot be applied falls back to the
//! value's plain string form.
//!
//! # Example
//!
//! ```
//! use pptable::format::format_value;
//! use pptable::Value;
//!
//! assert_eq!(format_value(&Value::Int(1234567), ""), "1,234,567");
//! assert_eq!(format_value(&Value::Float(0.5), ""), "0.500000");
//! assert_eq!(format_value(&Value::Float(3.14159), ".3"), "3.14");
//! assert_eq!(format_value(&Value::Int(1234), ".2R"), "1,200");
//! assert_eq!(format_value(&Value::Text("n/a".into()), ",d"), "n/a");
//! ```

pub mod number;
mod spec;

pub use number::{round_float, round_int, round_int_to_n, round_to_n};
pub use spec::{Align, FormatError, FormatSpec, Sign, MAX_FIELD};

use crate::model::Value;
use std::borrow::Cow;

/// Suffix marking a significant-digit rounding spec (`.2R`).
const ROUND_MARKER: char = 'R';

/// Suffix forcing general number formatting.
const GENERAL_MARKER: char = 'G';

/// Default specification for a value with no explicit format.
///
/// Integers get thousands separators, floats fixed point, text passes through.
pub fn default_spec(value: &Value) -> &'static str {
    match value {
        Value::Int(_) => ",",
        Value::Float(_) => "f",
        Value::Text(_) => "s",
    }
}

/// Format `value` with `spec`, falling back to its plain string form.
pub fn format_value(value: &Value, spec: &str) -> String {
    match try_format_value(value, spec) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(
                value = %value,
                spec,
                error = %err,
                "format spec not applicable, using plain form"
            );
            value.to_string()
        }
    }
}

/// Format `value` with `spec`, reporting why a spec cannot be applied.
pub fn try_format_value(value: &Value, spec: &str) -> Result<String, FormatError> {
    let (value, spec) = resolve(value, spec)?;
    FormatSpec::parse(&spec)?.apply(&value)
}

/// Apply the default and `.`-prefix rules, producing the spec that is actually used.
fn resolve<'a>(value: &'a Value, spec: &'a str) -> Result<(Cow<'a, Value>, Cow<'a, str>), FormatError> {
    if spec.is_empty() {
        return Ok((Cow::Borrowed(value), Cow::Borrowed(default_spec(value))));
    }

    if spec.starts_with('.') {
        if let (true, Value::Int(i)) = (spec.ends_with(ROUND_MARKER), value) {
            let digits = spec[1..]
                .chars()
                .next()
                .and_then(|c| c.to_digit(10))
                .ok_or_else(|| FormatError::MissingRoundingDigits(spec.to_string()))?;
            let rounded = round_int_to_n(*i, digits).ok_or(FormatError::Overflow)?;
            return Ok((Cow::Owned(Value::Int(rounded)), Cow::Borrowed(",")));
        }
        if !spec.ends_with(GENERAL_MARKER) {
            return Ok((Cow::Borrowed(value), Cow::Owned(format!("{}{}", spec, GENERAL_MARKER))));
        }
    }

    Ok((Cow::Borrowed(value), Cow::Borrowed(spec)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spec_defaults() {
        assert_eq!(format_value(&Value::Int(1234), ""), "1,234");
        assert_eq!(format_value(&Value::Int(-1234567), ""), "-1,234,567");
        assert_eq!(format_value(&Value::Int(12), ""), "12");
        assert_eq!(format_value(&Value::Float(1234.5), ""), "1234.500000");
        assert_eq!(format_value(&Value::Float(-0.25), ""), "-0.250000");
        assert_eq!(format_value(&Value::Text("North".into()), ""), "North");
    }

    #[test]
    fn test_explicit_specs() {
        assert_eq!(format_value(&Value::Int(1234567), ","), "1,234,567");
        assert_eq!(format_value(&Value::Float(0.1234), "%"), "12.340000%");
        assert_eq!(format_value(&Value::Float(1234.5678), ",.2f"), "1,234.57");
        assert_eq!(format_value(&Value::Int(7), ">4"), "   7");
    }

    #[test]
    fn test_precision_specs_get_general_marker() {
        assert_eq!(format_value(&Value::Float(3.14159), ".2"), "3.1");
        assert_eq!(format_value(&Value::Float(3.14159), ".2G"), "3.1");
        assert_eq!(format_value(&Value::Float(1234.5), ".3"), "1.23E+03");
        // An integer with a precision spec is formatted as a general number.
        assert_eq!(format_value(&Value::Int(1234), ".2"), "1.2E+03");
        // Typed precision specs gain the marker too and stop parsing.
        assert_eq!(format_value(&Value::Float(0.1234), ".1%"), "0.1234");
    }

    #[test]
    fn test_rounding_spec() {
        assert_eq!(format_value(&Value::Int(1234), ".2R"), "1,200");
        assert_eq!(format_value(&Value::Int(1234567), ".3R"), "1,230,000");
        assert_eq!(format_value(&Value::Int(-98765), ".1R"), "-100,000");
        assert_eq!(format_value(&Value::Int(0), ".2R"), "0");
    }

    #[test]
    fn test_rounding_spec_on_non_integers_falls_back() {
        // ".2R" + "G" is not a valid spec, so floats and text keep their plain form.
        assert_eq!(format_value(&Value::Float(1234.5), ".2R"), "1234.5");
        assert_eq!(format_value(&Value::Text("x".into()), ".2R"), "x");
    }

    #[test]
    fn test_fallback_never_fails() {
        assert_eq!(format_value(&Value::Float(2.5), ".2f"), "2.5");
        assert_eq!(format_value(&Value::Text("abc".into()), ","), "abc");
        assert_eq!(format_value(&Value::Float(2.5), "d"), "2.5");
        assert_eq!(format_value(&Value::Int(5), "garbage"), "5");
        assert_eq!(format_value(&Value::Int(1234), ".R"), "1234");
        assert_eq!(format_value(&Value::Float(f64::NAN), ",d"), "nan");
    }

    #[test]
    fn test_oversized_fields_fall_back() {
        assert_eq!(format_value(&Value::Int(1), "99999999999999"), "1");
        assert_eq!(format_value(&Value::Float(2.5), ".99999999999999f"), "2.5");
        assert_eq!(format_value(&Value::Float(2.5), ".99999999999999"), "2.5");
        assert_eq!(format_value(&Value::Text("abc".into()), ">18446744073709551616"), "abc");
        assert_eq!(
            try_format_value(&Value::Int(1), "99999999999999"),
            Err(FormatError::FieldTooLarge)
        );
    }

    #[test]
    fn test_try_format_value_reports_errors() {
        assert_eq!(
            try_format_value(&Value::Int(1234), ".xR"),
            Err(FormatError::MissingRoundingDigits(".xR".to_string()))
        );
        assert!(try_format_value(&Value::Float(2.5), ".2f").is_err());
        assert_eq!(try_format_value(&Value::Int(5), "").unwrap(), "5");
    }
}
