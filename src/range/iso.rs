//! ISO-8601 range grammar: `start/end` or `start--end`, where either side
//! may be an instant, a duration (`P...`) or empty for "now".

use super::duration::{add_duration, parse_duration, sub_duration, Duration};
use crate::core::{with_offset, Error, Result, Value};
use crate::types::iso;
use chrono::{DateTime, Offset, Utc};
use regex::Regex;
use std::sync::OnceLock;

static SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn separator() -> &'static Regex {
    SEPARATOR.get_or_init(|| Regex::new(r"/|--").expect("separator pattern is valid"))
}

/// Granularity of range bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Aware instants; naive text is taken as UTC. Bare dates are rejected.
    DateTime,
    /// Calendar dates; instants keep their date and durations lose their time part.
    Date,
}

impl Resolution {
    fn bound(self, text: &str) -> Result<Value> {
        match self {
            Resolution::DateTime => {
                let invalid = || Error::RangeSyntax("invalid datetime value".to_string());
                // Naive text must still parse with a `Z` suffix, which rules out bare dates.
                let (instant, offset) = match iso::parse_datetime(text).map_err(|_| invalid())? {
                    (instant, Some(offset)) => (instant, offset),
                    (_, None) => iso::parse_datetime(&format!("{text}Z"))
                        .map(|(instant, _)| (instant, Utc.fix()))
                        .map_err(|_| invalid())?,
                };
                with_offset(instant, offset)
                    .map(Value::DateTime)
                    .ok_or_else(invalid)
            }
            Resolution::Date => iso::parse_datetime(text)
                .map(|(instant, _)| Value::Date(instant.date()))
                .map_err(|_| Error::RangeSyntax("invalid date value".to_string())),
        }
    }

    fn duration(self, text: &str) -> Result<Duration> {
        let text = match self {
            Resolution::DateTime => text,
            Resolution::Date => text.split('T').next().unwrap_or(text),
        };
        parse_duration(text).ok_or_else(|| Error::InvalidDuration {
            value: text.to_string(),
        })
    }
}

/// Parse range text into `(lower, upper)` bounds.
///
/// Resolution of the two sides:
/// - two instants parse directly;
/// - one duration is anchored to the other side (`start = end - d` or
///   `end = start + d`);
/// - two durations are anchored to `now` (`now - d1`, `now + d2`).
///
/// Empty sides stand for `now`.
///
/// ```rust
/// use chrono::Utc;
/// use recordkit::range::{parse_iso_range, Resolution};
///
/// let (lower, upper) =
///     parse_iso_range("20240120T12--PT1H", Utc::now(), Resolution::DateTime).unwrap();
/// assert_eq!(lower.to_string(), "2024-01-20T12:00:00+00:00");
/// assert_eq!(upper.to_string(), "2024-01-20T13:00:00+00:00");
/// ```
pub fn parse_iso_range(
    text: &str,
    now: DateTime<Utc>,
    resolution: Resolution,
) -> Result<(Value, Value)> {
    let parts: Vec<&str> = separator().split(text).collect();
    if parts.len() != 2 {
        return Err(Error::RangeSyntax(
            "expecting exactly one range separator".to_string(),
        ));
    }
    let (start, end) = (parts[0], parts[1]);

    let now_text = iso::format_datetime(&now.fixed_offset());
    let start = if start.is_empty() { now_text.as_str() } else { start };
    let end = if end.is_empty() { now_text.as_str() } else { end };

    match (start.starts_with('P'), end.starts_with('P')) {
        (true, true) => {
            let middle = resolution.bound(&now_text)?;
            let lower = sub_duration(&middle, &resolution.duration(start)?)?;
            let upper = add_duration(&middle, &resolution.duration(end)?)?;
            Ok((lower, upper))
        }
        (true, false) => {
            let upper = resolution.bound(end)?;
            let lower = sub_duration(&upper, &resolution.duration(start)?)?;
            Ok((lower, upper))
        }
        (false, true) => {
            let lower = resolution.bound(start)?;
            let upper = add_duration(&lower, &resolution.duration(end)?)?;
            Ok((lower, upper))
        }
        (false, false) => Ok((resolution.bound(start)?, resolution.bound(end)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Value {
        Value::from(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn instants(text: &str) -> (Value, Value) {
        parse_iso_range(text, Utc::now(), Resolution::DateTime).unwrap()
    }

    fn dates(text: &str) -> (Value, Value) {
        parse_iso_range(text, Utc::now(), Resolution::Date).unwrap()
    }

    #[test]
    fn instant_ranges() {
        assert_eq!(
            instants("20240120T12--PT1H"),
            (utc(2024, 1, 20, 12, 0, 0), utc(2024, 1, 20, 13, 0, 0))
        );
        assert_eq!(
            instants("PT1H/20240120T12"),
            (utc(2024, 1, 20, 11, 0, 0), utc(2024, 1, 20, 12, 0, 0))
        );
        assert_eq!(
            instants("20231225T153233--20240120T12"),
            (utc(2023, 12, 25, 15, 32, 33), utc(2024, 1, 20, 12, 0, 0))
        );
    }

    #[test]
    fn explicit_offsets_are_kept() {
        let (lower, _) = instants("2024-01-01T12:00:00+01:00/PT1H");
        assert_eq!(lower, utc(2024, 1, 1, 11, 0, 0));
        assert_eq!(lower.to_string(), "2024-01-01T12:00:00+01:00");
    }

    #[test]
    fn date_ranges_drop_time_of_durations() {
        assert_eq!(dates("20240120--P0YT1H"), (date(2024, 1, 20), date(2024, 1, 20)));
        assert_eq!(dates("P1YT1H/20240120"), (date(2023, 1, 20), date(2024, 1, 20)));
        assert_eq!(dates("20231225--20240120"), (date(2023, 12, 25), date(2024, 1, 20)));
        assert_eq!(
            dates("2024-01-20T23:59:00Z/P1D"),
            (date(2024, 1, 20), date(2024, 1, 21))
        );
    }

    #[test]
    fn empty_sides_mean_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let (lower, upper) = parse_iso_range("/", now, Resolution::DateTime).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, Value::from(now));

        let (lower, upper) = parse_iso_range("PT10H/", now, Resolution::DateTime).unwrap();
        assert_eq!(lower, utc(2024, 5, 31, 22, 0, 0));
        assert_eq!(upper, Value::from(now));
    }

    #[test]
    fn double_durations_anchor_to_one_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let (lower, upper) = parse_iso_range("PT1H/PT1H", now, Resolution::DateTime).unwrap();
        assert_eq!(lower, utc(2024, 6, 1, 7, 0, 0));
        assert_eq!(upper, utc(2024, 6, 1, 9, 0, 0));

        let (lower, upper) = parse_iso_range("P1D/P1D", now, Resolution::Date).unwrap();
        assert_eq!((lower, upper), (date(2024, 5, 31), date(2024, 6, 2)));
    }

    #[test]
    fn instant_ranges_need_a_time() {
        for text in ["20240120--PT1H", "PT1H/2024-01-20", "20240120--20240121"] {
            assert_eq!(
                parse_iso_range(text, Utc::now(), Resolution::DateTime).unwrap_err(),
                Error::RangeSyntax("invalid datetime value".to_string()),
                "{text}"
            );
        }
        assert!(parse_iso_range("20240120--PT1H", Utc::now(), Resolution::Date).is_ok());
    }

    #[test]
    fn malformed_ranges() {
        for text in ["20240120", "a/b/c", "20240120/PXYZ", "nonsense/20240120"] {
            assert!(
                parse_iso_range(text, Utc::now(), Resolution::DateTime).is_err(),
                "{text}"
            );
        }
        assert_eq!(
            parse_iso_range("20240120T00/P", Utc::now(), Resolution::DateTime).unwrap_err(),
            Error::InvalidDuration {
                value: "P".to_string()
            }
        );
    }
}
