//! Scalar conversions shared by the document tree and the parser.
//!
//! Every parse helper trims its input and requires the whole remainder to
//! participate in the value; trailing garbage is a failure, reported as
//! `None` rather than an error.

/// Case-insensitive `"true"` / `"false"`. Anything else is `None`.
pub fn to_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Canonical lowercase rendering of a boolean.
pub fn from_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn to_i32(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

/// Decimal first; falls back to hex when the text carries a `#`, `0x`, or
/// `0X` prefix.
pub fn to_u32(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return Some(value);
    }
    parse_hex(trimmed).and_then(|v| u32::try_from(v).ok())
}

/// Accepts everything Rust's float grammar does, which includes
/// `inf`/`Infinity` in any letter case.
pub fn to_f64(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// Shortest round-trip rendering; non-finite values render as `null`.
/// Integral values print without a trailing `.0`, so `5.0` renders as `5`.
pub fn from_f64(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "null".to_string()
    }
}

/// Parses hexadecimal text with an optional `#`, `0x`, or `0X` prefix.
/// The digits after the prefix must be non-empty and all-hex.
pub fn parse_hex(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
