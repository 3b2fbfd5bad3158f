// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Normalization of dual-unit appearance strings onto one numeric scale.
//!
//! Only the metric element of a measurement is read. Values are parsed from
//! their leading numeric prefix, so `"203 cm"` and `"203cm (approx)"` both
//! read as 203. Anything without a recognized unit marker or a numeric
//! prefix is invalid, which callers treat the same as a missing value.

const CENTIMETERS_PER_METER: f64 = 100.0;
const KILOGRAMS_PER_TON: f64 = 1000.0;
const ROUNDING_SCALE: f64 = 1_000_000.0;

/// Height in centimeters.
pub fn normalize_height(value: Option<&str>) -> Option<f64> {
    let value = value.filter(|value| !value.is_empty())?;
    if value.contains("cm") {
        parse_int_prefix(value).map(|cm| cm as f64)
    } else if value.contains("meters") {
        parse_float_prefix(value).map(|meters| round_scaled(meters * CENTIMETERS_PER_METER))
    } else {
        None
    }
}

/// Weight in kilograms.
pub fn normalize_weight(value: Option<&str>) -> Option<f64> {
    let value = value.filter(|value| !value.is_empty())?;
    if value.contains("kg") {
        parse_int_prefix(value).map(|kg| kg as f64)
    } else if value.contains("tons") {
        parse_int_prefix(value).map(|tons| tons as f64 * KILOGRAMS_PER_TON)
    } else {
        None
    }
}

/// Parses an optionally signed run of ASCII digits after leading whitespace.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign_len, digits) = split_sign(trimmed);
    let digit_len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }
    trimmed[..sign_len + digit_len].parse().ok()
}

/// Parses `[sign] digits [. digits]` after leading whitespace. Exponents are
/// not recognized.
pub fn parse_float_prefix(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let (sign_len, rest) = split_sign(trimmed);
    let bytes = rest.as_bytes();

    let whole = bytes.iter().take_while(|byte| byte.is_ascii_digit()).count();
    let mut len = whole;
    let mut fraction = 0;
    if bytes.get(len) == Some(&b'.') {
        fraction = bytes[len + 1..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count();
        if fraction > 0 || whole > 0 {
            len += 1 + fraction;
        }
    }
    if whole == 0 && fraction == 0 {
        return None;
    }

    let literal = &trimmed[..sign_len + len];
    let literal = literal.strip_suffix('.').unwrap_or(literal);
    literal.parse().ok()
}

fn split_sign(value: &str) -> (usize, &str) {
    match value.as_bytes().first() {
        Some(b'+' | b'-') => (1, &value[1..]),
        _ => (0, value),
    }
}

// Meter strings carry at most two decimals; rounding keeps 1.85 m at 185 cm
// instead of 185.00000000000003.
fn round_scaled(value: f64) -> f64 {
    (value * ROUNDING_SCALE).round() / ROUNDING_SCALE
}

#[cfg(test)]
mod tests {
    use super::{normalize_height, normalize_weight, parse_float_prefix, parse_int_prefix};

    #[test]
    fn height_reads_centimeters_and_meters() {
        assert_eq!(normalize_height(Some("185 cm")), Some(185.0));
        assert_eq!(normalize_height(Some("1.85 meters")), Some(185.0));
        assert_eq!(normalize_height(Some("30.5 meters")), Some(3050.0));
        assert_eq!(normalize_height(Some("0 cm")), Some(0.0));
    }

    #[test]
    fn height_rejects_missing_units_and_numbers() {
        assert_eq!(normalize_height(None), None);
        assert_eq!(normalize_height(Some("")), None);
        assert_eq!(normalize_height(Some("6'1")), None);
        assert_eq!(normalize_height(Some("cm")), None);
        assert_eq!(normalize_height(Some("tall meters")), None);
    }

    #[test]
    fn weight_reads_kilograms_and_tons() {
        assert_eq!(normalize_weight(Some("441 kg")), Some(441.0));
        assert_eq!(normalize_weight(Some("2 tons")), Some(2000.0));
        assert_eq!(normalize_weight(Some("1.5 tons")), Some(1000.0));
        assert_eq!(normalize_weight(Some("980 lb")), None);
        assert_eq!(normalize_weight(Some("kg")), None);
        assert_eq!(normalize_weight(Some("")), None);
    }

    #[test]
    fn integer_prefix_stops_at_first_non_digit() {
        assert_eq!(parse_int_prefix("  203 cm"), Some(203));
        assert_eq!(parse_int_prefix("1,200 kg"), Some(1));
        assert_eq!(parse_int_prefix("-4kg"), Some(-4));
        assert_eq!(parse_int_prefix("+"), None);
        assert_eq!(parse_int_prefix(".5"), None);
    }

    #[test]
    fn float_prefix_accepts_partial_decimals() {
        assert_eq!(parse_float_prefix("1.85 meters"), Some(1.85));
        assert_eq!(parse_float_prefix("3. meters"), Some(3.0));
        assert_eq!(parse_float_prefix(".5 meters"), Some(0.5));
        assert_eq!(parse_float_prefix("12e3"), Some(12.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("meters"), None);
    }
}
