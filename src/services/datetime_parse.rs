// src/services/datetime_parse.rs
//! Lenient parsing of the date and time strings found in uploads and request bodies.
//! Everything is naive local time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    // Slash means month first, dash means day first
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a calendar day written in any of the common layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date()))
}

/// Parses a full `date time` value.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parses a time of day: `13:05`, `8:05:30`, `1:00 PM`, `8:05am`, `5 PM`.
/// A full timestamp is accepted too and its time part returned.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let upper = raw.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return None;
    }
    if let Some(ts) = parse_timestamp(&upper) {
        return Some(ts.time());
    }

    let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let mut parts = clock.split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => 0,
    };
    let second: u32 = match parts.next() {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let hour = match meridiem {
        None => hour,
        // 12-hour clock: 12 AM is midnight, 12 PM is noon
        Some(_) if hour == 0 || hour > 12 => return None,
        Some(false) => hour % 12,
        Some(true) => hour % 12 + 12,
    };
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Parses an optional request field, treating blank strings as absent.
pub fn parse_optional_timestamp(raw: Option<&str>) -> Result<Option<NaiveDateTime>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| format!("unrecognised timestamp '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_date_layouts() {
        let expected = ymd(2026, 1, 10);
        for raw in [
            "2026-01-10",
            " 2026/01/10 ",
            "01/10/2026",
            "1/10/2026",
            "10-Jan-2026",
            "Jan 10, 2026",
            "January 10, 2026",
            "2026-01-10 08:00:00",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "layout {:?}", raw);
        }
        assert_eq!(parse_date("10-01-2026"), Some(expected));
        assert_eq!(parse_date("01-10-2026"), Some(ymd(2026, 10, 1)));
        assert_eq!(parse_date("25-01-2026"), Some(ymd(2026, 1, 25)));
        assert_eq!(parse_date("01/25/2026"), Some(ymd(2026, 1, 25)));
        assert_eq!(parse_date("25/01/2026"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Date"), None);
        assert_eq!(parse_date("2026-02-30"), None);
    }

    #[test]
    fn test_time_of_day_layouts() {
        assert_eq!(parse_time_of_day("08:05"), Some(hms(8, 5, 0)));
        assert_eq!(parse_time_of_day("8:05:30"), Some(hms(8, 5, 30)));
        assert_eq!(parse_time_of_day("1:00"), Some(hms(1, 0, 0)));
        assert_eq!(parse_time_of_day("1:00 PM"), Some(hms(13, 0, 0)));
        assert_eq!(parse_time_of_day("8:05am"), Some(hms(8, 5, 0)));
        assert_eq!(parse_time_of_day("12:15 AM"), Some(hms(0, 15, 0)));
        assert_eq!(parse_time_of_day("12:15 PM"), Some(hms(12, 15, 0)));
        assert_eq!(parse_time_of_day("5 PM"), Some(hms(17, 0, 0)));
        assert_eq!(parse_time_of_day("2026-01-10 17:00:00"), Some(hms(17, 0, 0)));
    }

    #[test]
    fn test_time_of_day_rejects_garbage() {
        assert_eq!(parse_time_of_day(""), None);
        assert_eq!(parse_time_of_day("noon"), None);
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("13:00 PM"), None);
        assert_eq!(parse_time_of_day("1:2:3:4"), None);
    }

    #[test]
    fn test_optional_timestamp() {
        assert_eq!(parse_optional_timestamp(None), Ok(None));
        assert_eq!(parse_optional_timestamp(Some("  ")), Ok(None));
        assert_eq!(
            parse_optional_timestamp(Some("2026-01-10T17:30:00")),
            Ok(Some(ymd(2026, 1, 10).and_time(hms(17, 30, 0))))
        );
        assert!(parse_optional_timestamp(Some("yesterday")).is_err());
    }
}
