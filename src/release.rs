// Release-date parsing for the games dataset
// Format: abbreviated month, hyphen, two-digit year ("Jan-15")

use chrono::{Datelike, Month, NaiveDate};

/// Two-digit years at or below this map to 20xx, above it to 19xx
const CENTURY_PIVOT: u32 = 68;

/// Parse a `Mon-YY` release string into the first day of that month.
///
/// The month abbreviation is case-insensitive (`jan`, `JAN`, `Jan`); the year
/// must be exactly two ASCII digits. Anything else, including surrounding
/// whitespace or full month names, is rejected.
pub fn parse_release(value: &str) -> Option<NaiveDate> {
    let (month_part, year_part) = value.split_once('-')?;

    if month_part.len() != 3 || !month_part.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if year_part.len() != 2 || !year_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let month: Month = month_part.parse().ok()?;
    let yy: u32 = year_part.parse().ok()?;
    let year = if yy <= CENTURY_PIVOT { 2000 + yy } else { 1900 + yy };

    NaiveDate::from_ymd_opt(year as i32, month.number_from_month(), 1)
}

/// Calendar year of a `Mon-YY` release string
pub fn release_year(value: &str) -> Option<i32> {
    parse_release(value).map(|date| date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_basic() {
        let date = parse_release("Jan-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());

        let date = parse_release("Dec-09").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2009, 12, 1).unwrap());
    }

    #[test]
    fn test_parse_release_case_insensitive_month() {
        assert_eq!(release_year("mar-15"), Some(2015));
        assert_eq!(release_year("MAR-15"), Some(2015));
    }

    #[test]
    fn test_century_pivot() {
        assert_eq!(release_year("Jun-68"), Some(2068));
        assert_eq!(release_year("Jun-69"), Some(1969));
        assert_eq!(release_year("Oct-99"), Some(1999));
        assert_eq!(release_year("Oct-00"), Some(2000));
    }

    #[test]
    fn test_rejects_other_formats() {
        assert_eq!(parse_release("2015-01"), None);
        assert_eq!(parse_release("January-15"), None);
        assert_eq!(parse_release("Jan-2015"), None);
        assert_eq!(parse_release("Jan 15"), None);
        assert_eq!(parse_release(" Jan-15"), None);
        assert_eq!(parse_release("Foo-15"), None);
        assert_eq!(parse_release("Jan-1a"), None);
        assert_eq!(parse_release(""), None);
    }
}
