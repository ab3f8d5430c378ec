//! Number rendering and rounding primitives.
//!
//! Rendering functions take the magnitude of a value; the caller owns the sign.

use std::iter::repeat;

/// Plain string form of a float.
///
/// Shortest round-trip digits with at least one fractional digit. Scientific
/// notation is used when the decimal exponent is below -4 or at least 16.
pub fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sign = if x.is_sign_negative() { "-" } else { "" };
    format!("{}{}", sign, repr_magnitude(x.abs()))
}

/// [`float_repr`] of a non-negative finite value, without sign.
pub(crate) fn repr_magnitude(x: f64) -> String {
    let (digits, exp) = shortest_digits(x);
    if (-4..16).contains(&exp) {
        place_point(&digits, exp, true)
    } else {
        let mut out = String::with_capacity(digits.len() + 6);
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push_str(&exponent_suffix(exp, false));
        out
    }
}

/// Shortest round-trip significant digits and the decimal exponent of the first one.
fn shortest_digits(x: f64) -> (String, i32) {
    // `{:e}` renders e.g. "1.2345e3", "5e-324", "0e0"
    let s = format!("{:e}", x);
    let (mantissa, exp) = split_exponent(&s);
    (mantissa.replace('.', ""), exp)
}

fn split_exponent(s: &str) -> (&str, i32) {
    match s.split_once(['e', 'E']) {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

/// Lay out `digits` (first digit at 10^exp) in positional notation.
fn place_point(digits: &str, exp: i32, force_fraction: bool) -> String {
    let mut out = String::with_capacity(digits.len() + exp.unsigned_abs() as usize + 2);
    if exp < 0 {
        out.push_str("0.");
        out.extend(repeat('0').take((-exp - 1) as usize));
        out.push_str(digits);
        return out;
    }

    let int_len = exp as usize + 1;
    if digits.len() <= int_len {
        out.push_str(digits);
        out.extend(repeat('0').take(int_len - digits.len()));
        if force_fraction {
            out.push_str(".0");
        }
    } else {
        out.push_str(&digits[..int_len]);
        out.push('.');
        out.push_str(&digits[int_len..]);
    }
    out
}

/// `e+05` style exponent with at least two digits.
fn exponent_suffix(exp: i32, upper: bool) -> String {
    format!(
        "{}{}{:02}",
        if upper { 'E' } else { 'e' },
        if exp < 0 { '-' } else { '+' },
        exp.unsigned_abs()
    )
}

/// Fixed-point with `precision` fractional digits, correctly rounded.
pub fn fixed(x: f64, precision: usize) -> String {
    format!("{:.*}", precision, x)
}

/// Scientific notation with `precision` fractional mantissa digits.
pub fn scientific(x: f64, precision: usize, upper: bool) -> String {
    let s = format!("{:.*e}", precision, x);
    let (mantissa, exp) = split_exponent(&s);
    format!("{}{}", mantissa, exponent_suffix(exp, upper))
}

/// General format: fixed or scientific depending on the exponent.
///
/// `alternate` keeps trailing zeros and the decimal point. `dot_zero` appends
/// `.0` to fixed-notation results without a fractional part.
pub fn general(x: f64, precision: usize, upper: bool, alternate: bool, dot_zero: bool) -> String {
    let p = precision.max(1);
    let exp = if x == 0.0 {
        0
    } else {
        split_exponent(&format!("{:.*e}", p - 1, x)).1
    };

    let mut body = if (-4..p as i32).contains(&exp) {
        fixed(x, (p as i32 - 1 - exp) as usize)
    } else {
        scientific(x, p - 1, upper)
    };

    if alternate {
        if !body.contains('.') {
            let at = body.find(['e', 'E']).unwrap_or(body.len());
            body.insert(at, '.');
        }
    } else {
        body = strip_trailing_zeros(&body);
    }

    if dot_zero && !body.contains(['.', 'e', 'E']) {
        body.push_str(".0");
    }
    body
}

/// Drop trailing fractional zeros (and a bare point) from the mantissa.
fn strip_trailing_zeros(body: &str) -> String {
    let at = body.find(['e', 'E']).unwrap_or(body.len());
    let (mantissa, exponent) = body.split_at(at);
    if !mantissa.contains('.') {
        return body.to_string();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", trimmed, exponent)
}

/// Insert `sep` every `size` digits into the leading run of digits.
///
/// `is_digit` decides what counts as a digit, so hexadecimal bodies can be
/// grouped while an exponent marker in a decimal body ends the run.
pub fn group_digits(body: &str, sep: char, size: usize, is_digit: fn(char) -> bool) -> String {
    let end = body.find(|c: char| !is_digit(c)).unwrap_or(body.len());
    let (int_part, rest) = body.split_at(end);
    if int_part.len() <= size {
        return body.to_string();
    }

    let mut out = String::with_capacity(body.len() + int_part.len() / size);
    let lead = int_part.len() % size;
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (i + size - lead) % size == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out.push_str(rest);
    out
}

/// Round a float to `ndigits` decimal places, ties to even on the exact value.
pub fn round_float(x: f64, ndigits: i32) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }
    if ndigits >= 0 {
        // Beyond this every finite f64 is already exact.
        if ndigits > 330 {
            return x;
        }
        return fixed(x, ndigits as usize).parse().unwrap_or(x);
    }

    let pow = ndigits.checked_neg().map_or(f64::INFINITY, |e| 10f64.powi(e));
    if !pow.is_finite() {
        return 0.0 * x;
    }
    let y = (x / pow).round_ties_even() * pow;
    if y.is_finite() {
        y
    } else {
        x
    }
}

/// Round an integer to `ndigits` decimal places; only negative values change it.
///
/// Ties go to even. Returns `None` if the result does not fit in `i64`.
pub fn round_int(x: i64, ndigits: i32) -> Option<i64> {
    if ndigits >= 0 {
        return Some(x);
    }
    let exp = ndigits.unsigned_abs();
    if exp > 38 {
        return Some(0);
    }

    let pow = 10i128.pow(exp);
    let v = x as i128;
    let mut q = v.div_euclid(pow);
    let twice_rem = 2 * v.rem_euclid(pow);
    if twice_rem > pow || (twice_rem == pow && q % 2 != 0) {
        q += 1;
    }
    i64::try_from(q * pow).ok()
}

/// Round a float to `n` significant digits.
///
/// Zero and non-finite values are returned unchanged.
pub fn round_to_n(x: f64, n: u32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let magnitude = x.abs().log10().floor() as i32;
    round_float(x, -magnitude + (n as i32 - 1))
}

/// Round an integer to `n` significant digits.
///
/// Zero is returned unchanged. `None` if the result does not fit in `i64`.
pub fn round_int_to_n(x: i64, n: u32) -> Option<i64> {
    match x.unsigned_abs().checked_ilog10() {
        Some(magnitude) => round_int(x, -(magnitude as i32) + (n as i32 - 1)),
        None => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_repr() {
        assert_eq!(float_repr(0.0), "0.0");
        assert_eq!(float_repr(-0.0), "-0.0");
        assert_eq!(float_repr(3.0), "3.0");
        assert_eq!(float_repr(1234.5), "1234.5");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(0.00001), "1e-05");
        assert_eq!(float_repr(1e15), "1000000000000000.0");
        assert_eq!(float_repr(1.5e16), "1.5e+16");
        assert_eq!(float_repr(f64::INFINITY), "inf");
        assert_eq!(float_repr(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(scientific(1234.5, 2, false), "1.23e+03");
        assert_eq!(scientific(0.0, 2, false), "0.00e+00");
        assert_eq!(scientific(0.000123, 1, true), "1.2E-04");
        assert_eq!(scientific(1e100, 0, false), "1e+100");
    }

    #[test]
    fn test_general() {
        assert_eq!(general(1234.5, 6, false, false, false), "1234.5");
        assert_eq!(general(1234567.0, 6, false, false, false), "1.23457e+06");
        assert_eq!(general(0.0001, 6, false, false, false), "0.0001");
        assert_eq!(general(0.00001, 6, false, false, false), "1e-05");
        assert_eq!(general(3.14159, 2, false, false, false), "3.1");
        assert_eq!(general(1200.0, 6, false, false, false), "1200");
        assert_eq!(general(0.0, 6, false, false, false), "0");
        assert_eq!(general(1.0, 6, false, true, false), "1.00000");
        assert_eq!(general(1234.5, 2, true, false, true), "1.2E+03");
        assert_eq!(general(3.0, 2, false, false, true), "3.0");
    }

    #[test]
    fn test_group_digits() {
        let digit = |c: char| c.is_ascii_digit();
        assert_eq!(group_digits("1234567", ',', 3, digit), "1,234,567");
        assert_eq!(group_digits("123", ',', 3, digit), "123");
        assert_eq!(group_digits("1234.5678", ',', 3, digit), "1,234.5678");
        assert_eq!(group_digits("1e+16", ',', 3, digit), "1e+16");
        assert_eq!(
            group_digits("deadbeef", '_', 4, |c| c.is_ascii_hexdigit()),
            "dead_beef"
        );
    }

    #[test]
    fn test_round_int() {
        assert_eq!(round_int(1234, -2), Some(1200));
        assert_eq!(round_int(1250, -2), Some(1200));
        assert_eq!(round_int(1350, -2), Some(1400));
        assert_eq!(round_int(-1250, -2), Some(-1200));
        assert_eq!(round_int(1234, 2), Some(1234));
        assert_eq!(round_int(9_000_000_000_000_000_000, -19), None);
        assert_eq!(round_int(5, -40), Some(0));
    }

    #[test]
    fn test_round_float() {
        assert_eq!(round_float(2.675, 2), 2.67);
        assert_eq!(round_float(1234.5, -2), 1200.0);
        assert!(round_float(f64::NAN, 2).is_nan());
        assert_eq!(round_float(1234.5, i32::MIN), 0.0);
        assert!(round_float(-1234.5, i32::MIN).is_sign_negative());
        assert_eq!(round_float(1234.5, i32::MAX), 1234.5);
        assert_eq!(round_int(1234, i32::MIN), Some(0));
        assert_eq!(round_int(1234, i32::MAX), Some(1234));
    }

    #[test]
    fn test_round_to_n() {
        assert_eq!(round_int_to_n(1234, 2), Some(1200));
        assert_eq!(round_int_to_n(-98765, 3), Some(-98800));
        assert_eq!(round_int_to_n(7, 3), Some(7));
        assert_eq!(round_int_to_n(0, 3), Some(0));
        assert_eq!(round_to_n(0.0012345, 3), 0.00123);
        assert_eq!(round_to_n(1234.0, 2), 1200.0);
        assert_eq!(round_to_n(0.0, 3), 0.0);
    }
}
