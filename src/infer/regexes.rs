//! Compiled regex patterns for temporal type detection.
//!
//! Each pattern must match the whole cell. Captured fields are range checked
//! by the classifier, so the patterns only describe the shape.

use regex::Regex;

/// Pattern for `YYYY-MM-DD HH:MM:SS`.
pub static DATETIME_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})\s+([0-9]{1,2}):([0-9]{1,2}):([0-9]{1,2})$")
        .expect("Invalid datetime pattern")
});

/// Pattern for `YYYY-MM-DD HH:MM:SS.ffffff` (one to six fraction digits).
pub static DATETIME_FRACTION_PATTERN: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| {
        Regex::new(
            r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})\s+([0-9]{1,2}):([0-9]{1,2}):([0-9]{1,2})\.[0-9]{1,6}$",
        )
        .expect("Invalid fractional datetime pattern")
    });

/// Pattern for `YYYY-MM-DD`.
pub static DATE_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").expect("Invalid date pattern")
});

/// Pattern for `HH:MM:SS`.
pub static TIME_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{1,2}):([0-9]{1,2})$").expect("Invalid time pattern")
});

/// Pattern for runs of non-word characters in header names.
pub static NON_WORD_PATTERN: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\W+").expect("Invalid non-word pattern"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_patterns() {
        assert!(DATETIME_PATTERN.is_match("2023-12-31 12:30:45"));
        assert!(DATETIME_PATTERN.is_match("2023-1-5 1:2:3"));
        assert!(!DATETIME_PATTERN.is_match("2023-12-31T12:30:45"));
        assert!(!DATETIME_PATTERN.is_match("2023-12-31 12:30:45.5"));
        assert!(DATETIME_FRACTION_PATTERN.is_match("2023-12-31 12:30:45.123456"));
        assert!(!DATETIME_FRACTION_PATTERN.is_match("2023-12-31 12:30:45.1234567"));
    }

    #[test]
    fn test_date_and_time_patterns() {
        assert!(DATE_PATTERN.is_match("2023-12-31"));
        assert!(!DATE_PATTERN.is_match("2023/12/31"));
        assert!(!DATE_PATTERN.is_match("23-12-31"));
        assert!(!DATE_PATTERN.is_match("2023-12-31 "));
        assert!(TIME_PATTERN.is_match("23:59:59"));
        assert!(!TIME_PATTERN.is_match("23:59"));
    }

    #[test]
    fn test_non_word_pattern() {
        assert_eq!(NON_WORD_PATTERN.replace_all("total $ (usd)", "_"), "total_usd_");
    }
}
