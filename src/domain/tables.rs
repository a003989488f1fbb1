use chrono::NaiveTime;

use crate::error::{AppError, AppResult};

pub const MIN_CAPACITY: i32 = 1;
pub const MAX_CAPACITY: i32 = 20;

/// Table-number format rule: 1–10 characters, at least one letter and one
/// digit, no whitespace. Uniqueness is case-insensitive and checked at the
/// persistence layer.
pub fn validate_table_number(table_number: &str) -> AppResult<()> {
    if table_number.is_empty() || table_number.chars().count() > 10 {
        return Err(AppError::Validation(
            "Table number must be 1-10 characters".to_string(),
        ));
    }
    if table_number.chars().any(|c| c.is_whitespace()) {
        return Err(AppError::Validation(
            "Table number must not contain whitespace".to_string(),
        ));
    }
    if !table_number.chars().any(|c| c.is_alphabetic()) {
        return Err(AppError::Validation(
            "Table number must contain at least one letter".to_string(),
        ));
    }
    if !table_number.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Table number must contain at least one digit".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_capacity(capacity: i32) -> AppResult<()> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(AppError::Validation(format!(
            "Capacity must be between {} and {}",
            MIN_CAPACITY, MAX_CAPACITY
        )));
    }
    Ok(())
}

/// Display sort key: letter prefix compared lexicographically (lowercased),
/// trailing numeric suffix compared numerically, so "A2" sorts before "A10".
pub fn table_sort_key(table_number: &str) -> (String, u64) {
    let prefix = table_number.trim_end_matches(|c: char| c.is_ascii_digit());
    let suffix = &table_number[prefix.len()..];
    (prefix.to_lowercase(), suffix.parse().unwrap_or(0))
}

/// Half-open window overlap on a single date.
pub fn windows_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_table_numbers() {
        assert!(validate_table_number("A1").is_ok());
        assert!(validate_table_number("vip12").is_ok());
        assert!(validate_table_number("T01").is_ok());
    }

    #[test]
    fn rejects_malformed_table_numbers() {
        assert!(validate_table_number("").is_err());
        assert!(validate_table_number("ABCDEFGHI12").is_err()); // too long
        assert!(validate_table_number("A 1").is_err()); // whitespace
        assert!(validate_table_number("12").is_err()); // no letter
        assert!(validate_table_number("AB").is_err()); // no digit
    }

    #[test]
    fn sort_key_splits_prefix_and_numeric_suffix() {
        assert_eq!(table_sort_key("A10"), ("a".to_string(), 10));
        assert_eq!(table_sort_key("vip2"), ("vip".to_string(), 2));

        let mut names = vec!["B1", "A10", "A2", "a1"];
        names.sort_by_key(|n| table_sort_key(n));
        assert_eq!(names, vec!["a1", "A2", "A10", "B1"]);
    }

    #[test]
    fn overlap_is_exclusive_at_the_boundary() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

        assert!(windows_overlap(t(18, 0), t(20, 0), t(19, 0), t(21, 0)));
        assert!(windows_overlap(t(19, 0), t(21, 0), t(18, 0), t(20, 0)));
        // Back-to-back sittings do not conflict.
        assert!(!windows_overlap(t(18, 0), t(20, 0), t(20, 0), t(22, 0)));
        assert!(!windows_overlap(t(12, 0), t(13, 0), t(18, 0), t(20, 0)));
    }
}
