//! Type detection for a single CSV cell.

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::regexes::*;
use crate::sql_type::SqlType;

/// Decimal digits of the largest magnitude that still fits `int`.
const INT_MAX_DIGITS: &str = "2147483647";

/// Check for a base-10 integer and return its magnitude digits,
/// with sign and leading zeros stripped ("" is zero).
#[inline]
fn integer_magnitude(s: &str) -> Option<&str> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.trim_start_matches('0'))
}

/// Compare magnitudes as digit strings so arbitrarily long integers never overflow.
#[inline]
fn exceeds_int(magnitude: &str) -> bool {
    match magnitude.len().cmp(&INT_MAX_DIGITS.len()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => magnitude > INT_MAX_DIGITS,
    }
}

#[inline]
fn capture_u32(caps: &Captures<'_>, i: usize) -> u32 {
    caps.get(i)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(u32::MAX)
}

/// Calendar check for captures 1..=3 (year, month, day).
fn is_valid_date(caps: &Captures<'_>) -> bool {
    let year = capture_u32(caps, 1);
    if year == 0 || year > 9999 {
        return false;
    }
    NaiveDate::from_ymd_opt(year as i32, capture_u32(caps, 2), capture_u32(caps, 3)).is_some()
}

/// Clock check for three captures starting at `first`. Seconds allow the
/// leap values 60 and 61.
fn is_valid_time(caps: &Captures<'_>, first: usize) -> bool {
    capture_u32(caps, first) < 24
        && capture_u32(caps, first + 1) < 60
        && capture_u32(caps, first + 2) <= 61
}

fn matches_datetime(pattern: &Regex, value: &str) -> bool {
    pattern
        .captures(value)
        .is_some_and(|caps| is_valid_date(&caps) && is_valid_time(&caps, 4))
}

/// Try the temporal formats in order; the whole string must match.
fn detect_temporal(value: &str) -> Option<SqlType> {
    if matches_datetime(&DATETIME_PATTERN, value)
        || matches_datetime(&DATETIME_FRACTION_PATTERN, value)
    {
        return Some(SqlType::DateTime);
    }

    if DATE_PATTERN
        .captures(value)
        .is_some_and(|caps| is_valid_date(&caps))
    {
        return Some(SqlType::Date);
    }

    if TIME_PATTERN
        .captures(value)
        .is_some_and(|caps| is_valid_time(&caps, 1))
    {
        return Some(SqlType::Time);
    }

    None
}

/// Detect the type of a single cell value.
///
/// Total: every input, including the empty string, maps to exactly one type.
/// Numbers tolerate surrounding whitespace; temporal formats do not.
pub fn detect_cell_type(value: &str) -> SqlType {
    let trimmed = value.trim();

    if let Some(magnitude) = integer_magnitude(trimmed) {
        return if exceeds_int(magnitude) {
            SqlType::BigInt
        } else {
            SqlType::Int
        };
    }

    // Anything the float parser accepts, including exponents, inf and nan
    if trimmed.parse::<f64>().is_ok() {
        return SqlType::Double;
    }

    if let Some(temporal) = detect_temporal(value) {
        return temporal;
    }

    if value.chars().count() > SqlType::VARCHAR_MAX_CHARS {
        SqlType::Text
    } else {
        SqlType::Varchar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_cell_type() {
        assert_eq!(detect_cell_type("123"), SqlType::Int);
        assert_eq!(detect_cell_type("-123"), SqlType::Int);
        assert_eq!(detect_cell_type("12.34"), SqlType::Double);
        assert_eq!(detect_cell_type("2023-12-31"), SqlType::Date);
        assert_eq!(detect_cell_type("2023-12-31 12:30:45"), SqlType::DateTime);
        assert_eq!(detect_cell_type("2023-12-31 12:30:45.123"), SqlType::DateTime);
        assert_eq!(detect_cell_type("12:30:45"), SqlType::Time);
        assert_eq!(detect_cell_type("hello"), SqlType::Varchar);
        assert_eq!(detect_cell_type(""), SqlType::Varchar);
    }

    #[test]
    fn test_int_boundary() {
        assert_eq!(detect_cell_type("2147483647"), SqlType::Int);
        assert_eq!(detect_cell_type("-2147483647"), SqlType::Int);
        assert_eq!(detect_cell_type("2147483648"), SqlType::BigInt);
        assert_eq!(detect_cell_type("-2147483648"), SqlType::BigInt);
        assert_eq!(detect_cell_type("0002147483647"), SqlType::Int);
        assert_eq!(detect_cell_type("+0"), SqlType::Int);
        // Wider than any machine integer, still not an error
        assert_eq!(
            detect_cell_type("123456789012345678901234567890"),
            SqlType::BigInt
        );
    }

    #[test]
    fn test_numbers_allow_surrounding_whitespace() {
        assert_eq!(detect_cell_type(" 42 "), SqlType::Int);
        assert_eq!(detect_cell_type("\t4.5"), SqlType::Double);
        assert_eq!(detect_cell_type("4 2"), SqlType::Varchar);
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(detect_cell_type("1e5"), SqlType::Double);
        assert_eq!(detect_cell_type("5."), SqlType::Double);
        assert_eq!(detect_cell_type(".5"), SqlType::Double);
        assert_eq!(detect_cell_type("-0.0"), SqlType::Double);
        assert_eq!(detect_cell_type("inf"), SqlType::Double);
        assert_eq!(detect_cell_type("NaN"), SqlType::Double);
        assert_eq!(detect_cell_type("1,5"), SqlType::Varchar);
        assert_eq!(detect_cell_type("-"), SqlType::Varchar);
    }

    #[test]
    fn test_temporal_requires_full_valid_match() {
        assert_eq!(detect_cell_type("2023-02-30"), SqlType::Varchar);
        assert_eq!(detect_cell_type("2023-13-01"), SqlType::Varchar);
        assert_eq!(detect_cell_type("2024-02-29"), SqlType::Date);
        assert_eq!(detect_cell_type("0000-01-01"), SqlType::Varchar);
        assert_eq!(detect_cell_type("24:00:00"), SqlType::Varchar);
        assert_eq!(detect_cell_type("23:59:61"), SqlType::Time);
        assert_eq!(detect_cell_type(" 2023-12-31"), SqlType::Varchar);
        assert_eq!(detect_cell_type("2023-12-31x"), SqlType::Varchar);
        assert_eq!(detect_cell_type("2023-12-31T12:30:45"), SqlType::Varchar);
        assert_eq!(
            detect_cell_type("2023-12-31 12:30:45.1234567"),
            SqlType::Varchar
        );
    }

    #[test]
    fn test_length_bucket() {
        let at_limit = "a".repeat(255);
        let over_limit = "a".repeat(256);
        assert_eq!(detect_cell_type(&at_limit), SqlType::Varchar);
        assert_eq!(detect_cell_type(&over_limit), SqlType::Text);
        // Characters, not bytes
        let wide = "é".repeat(200);
        assert_eq!(detect_cell_type(&wide), SqlType::Varchar);
    }

    #[test]
    fn test_classifier_is_total() {
        for value in ["", " ", "\u{0}", "--", "1-2", "💥", "12:", "+", "-e5"] {
            let t = detect_cell_type(value);
            assert!(SqlType::from_index(t.as_index()).is_some());
        }
    }
}
