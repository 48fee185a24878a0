//! Field normalization: raw cell text to comparable amounts and dates

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::str::FromStr;

/// Date-only formats, tried in order. US month/day ordering wins over
/// day/month when both parse.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-01-15
    "%Y/%m/%d", // 2024/01/15
    "%m/%d/%Y", // 01/15/2024
    "%m/%d/%y", // 01/15/24
    "%m-%d-%Y", // 01-15-2024
    "%d/%m/%Y", // 15/01/2024
    "%d.%m.%Y", // 15.01.2024
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
    "%d %b %Y", // 15 Jan 2024
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse an amount, tolerating currency symbols and thousands separators
///
/// Every character other than an ASCII digit, `.` or `-` is stripped before
/// parsing. Returns `None` (NotANumber) for empty or malformed input such as
/// repeated signs, a sign after the first digit, or more than one decimal
/// point. `None` never compares equal to anything during matching.
pub fn normalize_amount(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let unsigned = cleaned.strip_prefix('-').unwrap_or(&cleaned);
    if !unsigned.chars().any(|c| c.is_ascii_digit())
        || unsigned.contains('-')
        || unsigned.matches('.').count() > 1
    {
        return None;
    }

    BigDecimal::from_str(&cleaned).ok()
}

/// Parse a calendar date without depending on the host locale
///
/// Accepts the common bank export formats plus RFC 3339 and ISO date-times,
/// whose time component is dropped. Empty or unrecognised input yields `None`.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            // "%m/%d/%Y" happily reads "01/15/24" as year 24
            if date.year() >= 1000 {
                return Some(date);
            }
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Some(datetime.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|datetime| datetime.date())
}

/// Absolute distance in whole days between two dates
///
/// `None` stands for an infinite distance: it is returned whenever either
/// date is missing, and it never satisfies a finite day tolerance.
pub fn day_distance(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a - b).num_days().unsigned_abs()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_normalize_amount_strips_symbols() {
        assert_eq!(normalize_amount("$1,234.56"), Some(dec("1234.56")));
        assert_eq!(normalize_amount("-42.10"), Some(dec("-42.10")));
        assert_eq!(normalize_amount("€ -7"), Some(dec("-7")));
        assert_eq!(normalize_amount("  100 USD "), Some(dec("100")));
    }

    #[test]
    fn test_normalize_amount_not_a_number() {
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("abc"), None);
        assert_eq!(normalize_amount("--5"), None);
        assert_eq!(normalize_amount("12-3"), None);
        assert_eq!(normalize_amount("1.2.3"), None);
        assert_eq!(normalize_amount("-"), None);
        assert_eq!(normalize_amount("."), None);
    }

    #[test]
    fn test_normalize_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(normalize_date("2024-01-15"), expected);
        assert_eq!(normalize_date("01/15/2024"), expected);
        assert_eq!(normalize_date("01/15/24"), expected);
        assert_eq!(normalize_date("15/01/2024"), expected);
        assert_eq!(normalize_date("Jan 15, 2024"), expected);
        assert_eq!(normalize_date("2024-01-15T09:30:00Z"), expected);
        assert_eq!(normalize_date("2024-01-15 09:30:00"), expected);
    }

    #[test]
    fn test_normalize_date_unparseable() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("   "), None);
        assert_eq!(normalize_date("yesterday"), None);
        assert_eq!(normalize_date("2024-13-45"), None);
    }

    #[test]
    fn test_day_distance() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1);
        let b = NaiveDate::from_ymd_opt(2024, 1, 10);

        assert_eq!(day_distance(a, b), Some(9));
        assert_eq!(day_distance(b, a), Some(9));
        assert_eq!(day_distance(a, a), Some(0));
        assert_eq!(day_distance(a, None), None);
        assert_eq!(day_distance(None, None), None);
    }
}
