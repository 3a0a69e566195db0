//! Type inference logic for values and columns.

use crate::record::Scalar;
use crate::types::DominantType;
use crate::utils::{is_boolean_string, parse_number};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

// Date pattern regexes - compiled once at startup
pub(crate) static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("Invalid regex: MM/DD/YYYY"),
        Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("Invalid regex: DD.MM.YYYY"),
    ]
});

pub(crate) static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex: email"));

pub(crate) static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("Invalid regex: url"));

/// Check if a string matches one of the supported date layouts.
pub(crate) fn is_date_string(s: &str) -> bool {
    DATE_PATTERNS.iter().any(|pattern| pattern.is_match(s))
}

/// Detect the type of a single value.
///
/// Text is checked in priority order: empty, numeric, date, email, url,
/// boolean, and finally plain text.
pub fn detect_value_type(value: &Scalar) -> DominantType {
    match value {
        Scalar::Null => DominantType::Empty,
        Scalar::Bool(_) => DominantType::Boolean,
        Scalar::Int(_) => DominantType::Integer,
        Scalar::Float(f) if f.is_finite() => DominantType::Float,
        Scalar::Float(_) => DominantType::Text,
        Scalar::String(s) => detect_text_type(s),
    }
}

/// Detect the type of a raw text value.
pub fn detect_text_type(raw: &str) -> DominantType {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DominantType::Empty;
    }

    if parse_number(trimmed).is_some() {
        return if trimmed.contains('.') {
            DominantType::Float
        } else {
            DominantType::Integer
        };
    }

    if is_date_string(trimmed) {
        return DominantType::Date;
    }

    if EMAIL_PATTERN.is_match(trimmed) {
        return DominantType::Email;
    }

    if URL_PATTERN.is_match(trimmed) {
        return DominantType::Url;
    }

    if is_boolean_string(trimmed) {
        return DominantType::Boolean;
    }

    DominantType::Text
}

/// Pick the most frequent type among non-missing values.
///
/// Ties resolve toward the type that comes first in detection order.
/// A column with no non-missing values is [`DominantType::Empty`].
pub(crate) fn dominant_type(type_counts: &BTreeMap<DominantType, usize>) -> DominantType {
    type_counts
        .iter()
        .filter(|(ty, count)| **ty != DominantType::Empty && **count > 0)
        // BTreeMap iterates in priority order; keep the first maximum
        .fold(None, |best: Option<(DominantType, usize)>, (ty, count)| match best {
            Some((_, best_count)) if best_count >= *count => best,
            _ => Some((*ty, *count)),
        })
        .map(|(ty, _)| ty)
        .unwrap_or(DominantType::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_empty() {
        assert_eq!(detect_value_type(&Scalar::Null), DominantType::Empty);
        assert_eq!(detect_text_type("   "), DominantType::Empty);
    }

    #[test]
    fn test_detect_numeric() {
        assert_eq!(detect_text_type("25"), DominantType::Integer);
        assert_eq!(detect_text_type("-7"), DominantType::Integer);
        assert_eq!(detect_text_type("3.14"), DominantType::Float);
        assert_eq!(detect_value_type(&Scalar::Int(4)), DominantType::Integer);
        assert_eq!(detect_value_type(&Scalar::Float(4.5)), DominantType::Float);
    }

    #[test]
    fn test_detect_dates() {
        assert_eq!(detect_text_type("2024-01-15"), DominantType::Date);
        assert_eq!(detect_text_type("01/15/2024"), DominantType::Date);
        assert_eq!(detect_text_type("15.01.2024"), DominantType::Date);
        assert_eq!(detect_text_type("2024/01/15"), DominantType::Text);
    }

    #[test]
    fn test_detect_email_and_url() {
        assert_eq!(detect_text_type("anna@example.am"), DominantType::Email);
        assert_eq!(detect_text_type("https://example.com/x"), DominantType::Url);
        assert_eq!(detect_text_type("http://a.b"), DominantType::Url);
        assert_eq!(detect_text_type("ftp://a.b"), DominantType::Text);
    }

    #[test]
    fn test_detect_boolean_words() {
        assert_eq!(detect_text_type("Yes"), DominantType::Boolean);
        assert_eq!(detect_text_type("այո"), DominantType::Boolean);
        assert_eq!(detect_value_type(&Scalar::Bool(false)), DominantType::Boolean);
        // numbers win over booleans
        assert_eq!(detect_text_type("1"), DominantType::Integer);
    }

    #[test]
    fn test_detect_text() {
        assert_eq!(detect_text_type("Yerevan"), DominantType::Text);
    }

    #[test]
    fn test_dominant_type_majority_and_ties() {
        let mut counts = BTreeMap::new();
        counts.insert(DominantType::Text, 3);
        counts.insert(DominantType::Integer, 5);
        counts.insert(DominantType::Empty, 10);
        assert_eq!(dominant_type(&counts), DominantType::Integer);

        let mut tie = BTreeMap::new();
        tie.insert(DominantType::Text, 2);
        tie.insert(DominantType::Float, 2);
        assert_eq!(dominant_type(&tie), DominantType::Float);

        assert_eq!(dominant_type(&BTreeMap::new()), DominantType::Empty);
    }
}
