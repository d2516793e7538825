//! Validation of free-text survey answers.
//!
//! Each function rejects by returning `None`; the step handlers map that
//! to a corrective message without touching the draft.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D+").unwrap());

/// Raw day/month/year fields extracted from user input.
///
/// Not range-checked yet: `99.99.2025` parses fine here and only fails in
/// [`DateParts::to_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl DateParts {
    /// Calendar construction; fails structurally on impossible dates
    /// instead of wrapping.
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// Extract a DD.MM.YYYY date from arbitrary text.
///
/// All non-digit characters are discarded; the input is accepted iff
/// exactly 8 digits remain, read positionally as day, month, year. Any
/// separator works: `01.01.2099`, `01/01/2099` and `01012099` are equal.
pub fn parse_date(text: &str) -> Option<DateParts> {
    let digits = NON_DIGITS.replace_all(text, "");
    let digits = digits.as_ref();
    if digits.len() != 8 {
        return None;
    }

    let day = digits[0..2].parse().ok()?;
    let month = digits[2..4].parse().ok()?;
    let year = digits[4..8].parse().ok()?;

    Some(DateParts { day, month, year })
}

/// Parse a digits-only answer bounded to `[1, max]`.
pub fn parse_bounded_int(text: &str, max: u8) -> Option<u8> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let value: u8 = text.parse().ok()?;
    (1..=max).contains(&value).then_some(value)
}

/// Parse a digits-only whole-number distance.
pub fn parse_distance(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    text.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

/// Case-insensitive match of the localized yes/no tokens.
pub fn parse_yes_no(text: &str) -> Option<YesNo> {
    match text.to_lowercase().as_str() {
        "да" => Some(YesNo::Yes),
        "нет" => Some(YesNo::No),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_with_separators() {
        let parts = parse_date("01.01.2099").unwrap();
        assert_eq!(
            parts,
            DateParts {
                day: 1,
                month: 1,
                year: 2099
            }
        );
        assert_eq!(parse_date("01/01/2099"), Some(parts));
        assert_eq!(parse_date("01012099"), Some(parts));
        assert_eq!(parse_date(" 01 01 2099 "), Some(parts));
    }

    #[test]
    fn test_parse_date_digit_count() {
        // Fewer than 8 digits
        assert_eq!(parse_date("1.1.21"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("today"), None);
        // More than 8 digits
        assert_eq!(parse_date("01.01.20999"), None);
    }

    #[test]
    fn test_parse_date_is_positional() {
        let parts = parse_date("31.12.2098").unwrap();
        assert_eq!(parts.day, 31);
        assert_eq!(parts.month, 12);
        assert_eq!(parts.year, 2098);
    }

    #[test]
    fn test_parse_date_does_not_range_check() {
        // 8 digits is enough for extraction; ranges are a calendar concern
        let parts = parse_date("99.99.2025").unwrap();
        assert_eq!(parts.day, 99);
        assert_eq!(parts.month, 99);
        assert!(parts.to_date().is_none());
    }

    #[test]
    fn test_to_date_rejects_impossible_dates() {
        assert!(parse_date("13.13.2025").unwrap().to_date().is_none());
        assert!(parse_date("31.02.2025").unwrap().to_date().is_none());

        let date = parse_date("28.02.2025").unwrap().to_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_parse_bounded_int() {
        assert_eq!(parse_bounded_int("1", 5), Some(1));
        assert_eq!(parse_bounded_int("5", 5), Some(5));
        assert_eq!(parse_bounded_int("3", 5), Some(3));

        assert_eq!(parse_bounded_int("0", 5), None);
        assert_eq!(parse_bounded_int("6", 5), None);
        assert_eq!(parse_bounded_int("-3", 5), None);
        assert_eq!(parse_bounded_int("3.5", 5), None);
        assert_eq!(parse_bounded_int("three", 5), None);
        assert_eq!(parse_bounded_int("", 5), None);
        // Larger than u8 must not panic
        assert_eq!(parse_bounded_int("99999999999", 5), None);
    }

    #[test]
    fn test_parse_distance() {
        assert_eq!(parse_distance("0"), Some(0));
        assert_eq!(parse_distance("12"), Some(12));
        assert_eq!(parse_distance("3km"), None);
        assert_eq!(parse_distance("-2"), None);
        assert_eq!(parse_distance(""), None);
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("да"), Some(YesNo::Yes));
        assert_eq!(parse_yes_no("Да"), Some(YesNo::Yes));
        assert_eq!(parse_yes_no("НЕТ"), Some(YesNo::No));
        assert_eq!(parse_yes_no("нет"), Some(YesNo::No));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no(""), None);
    }
}
