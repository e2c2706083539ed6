//! ISO-8601 durations and calendar-aware duration arithmetic.

use crate::core::{with_offset, Error, Result, Value};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    Timelike, Utc,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Neg;
use std::sync::OnceLock;

static DURATION: OnceLock<Regex> = OnceLock::new();

fn duration_pattern() -> &'static Regex {
    DURATION.get_or_init(|| {
        Regex::new(concat!(
            r"^P(?:([0-9]+)Y)?(?:([0-9]+)M)?(?:([0-9]+)W)?(?:([0-9]+)D)?",
            r"(?:T(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+(?:[.,][0-9]+)?)S)?)?$",
        ))
        .expect("duration pattern is valid")
    })
}

/// A calendar duration: `PnYnMnWnDTnHnMnS`.
///
/// Components are kept separately since years and months have no fixed
/// length. Only seconds may be fractional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: f64,
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration {
            years: -self.years,
            months: -self.months,
            weeks: -self.weeks,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }
}

/// Parse an ISO-8601 duration.
///
/// Returns `None` when the text does not match the grammar or names no
/// component at all (`"P"`, `"PT"`). Callers decide whether that is fatal.
///
/// ```rust
/// use recordkit::range::parse_duration;
///
/// let parsed = parse_duration("P1Y2M3DT4H5M6S").unwrap();
/// assert_eq!((parsed.years, parsed.months, parsed.days), (1, 2, 3));
/// assert_eq!((parsed.hours, parsed.minutes, parsed.seconds), (4, 5, 6.0));
///
/// assert!(parse_duration("ABC").is_none());
/// assert!(parse_duration("P1.5Y").is_none());
/// ```
pub fn parse_duration(text: &str) -> Option<Duration> {
    let captures = duration_pattern().captures(text)?;
    if captures.iter().skip(1).all(|group| group.is_none()) {
        return None;
    }

    let whole = |at: usize| -> Option<i64> {
        match captures.get(at) {
            Some(group) => group.as_str().parse().ok(),
            None => Some(0),
        }
    };
    let seconds = match captures.get(7) {
        Some(group) => group.as_str().replace(',', ".").parse().ok()?,
        None => 0.0,
    };

    Some(Duration {
        years: whole(1)?,
        months: whole(2)?,
        weeks: whole(3)?,
        days: whole(4)?,
        hours: whole(5)?,
        minutes: whole(6)?,
        seconds,
    })
}

/// Add years and months first (day pinned to 1), then weeks and days.
pub fn add_to_date(date: NaiveDate, duration: &Duration) -> Option<NaiveDate> {
    let months = i64::from(date.month0()).checked_add(duration.months)?;
    let year = i64::from(date.year())
        .checked_add(duration.years)?
        .checked_add(months.div_euclid(12))?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;

    let days = duration
        .weeks
        .checked_mul(7)?
        .checked_add(duration.days)?
        .checked_add(i64::from(date.day()) - 1)?;
    first.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Add the date part as for dates, then hours, minutes and seconds as one
/// time-of-day delta. Sub-second precision is kept.
pub fn add_to_datetime(
    instant: &DateTime<FixedOffset>,
    duration: &Duration,
) -> Option<DateTime<FixedOffset>> {
    let local = instant.naive_local();
    let date = add_to_date(local.date(), duration)?;

    let time = local.time();
    let time_of_day = i64::from(time.num_seconds_from_midnight()) * 1_000_000
        + i64::from(time.nanosecond() % 1_000_000_000 / 1_000);
    let seconds = (duration.seconds * 1_000_000.0).round();
    if !seconds.is_finite() || seconds.abs() > 9.0e15 {
        return None;
    }
    let delta = duration
        .hours
        .checked_mul(3_600_000_000)?
        .checked_add(duration.minutes.checked_mul(60_000_000)?)?
        .checked_add(seconds as i64)?
        .checked_add(time_of_day)?;

    let shifted: NaiveDateTime = date
        .and_time(NaiveTime::MIN)
        .checked_add_signed(TimeDelta::microseconds(delta))?;
    with_offset(shifted, *instant.offset())
}

/// Add a duration to a date or instant value. Naive instants are taken as UTC.
pub fn add_duration(value: &Value, duration: &Duration) -> Result<Value> {
    let out_of_range = || Error::invalid("date value out of range");
    match value {
        Value::Date(date) => add_to_date(*date, duration)
            .map(Value::Date)
            .ok_or_else(out_of_range),
        Value::DateTime(instant) => add_to_datetime(instant, duration)
            .map(Value::DateTime)
            .ok_or_else(out_of_range),
        Value::NaiveDateTime(instant) => with_offset(*instant, Utc.fix())
            .and_then(|aware| add_to_datetime(&aware, duration))
            .map(Value::DateTime)
            .ok_or_else(out_of_range),
        other => Err(Error::invalid(format!(
            "expecting a date or datetime, not {}",
            other.kind()
        ))),
    }
}

/// Subtract a duration: addition of its component-wise negation.
pub fn sub_duration(value: &Value, duration: &Duration) -> Result<Value> {
    add_duration(value, &-*duration)
}
