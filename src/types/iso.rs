//! ISO-8601 date/time parsing and formatting.
//!
//! Accepts the extended (`2024-01-20T12:30:00`) and basic (`20240120T1230`)
//! forms, optional fractional seconds (`.` or `,`), and offsets written as
//! `Z`, `+HH`, `+HHMM` or `+HH:MM`. A bare date parses as midnight.
//!
//! Formatting mirrors the usual ISO rendering: microseconds appear only when
//! non-zero and offsets are always written `+HH:MM`.

use crate::core::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

fn invalid(text: &str) -> Error {
    Error::invalid(format!("Invalid isoformat string: '{text}'"))
}

/// Parses exactly two ASCII digits.
fn two_digits(part: &str, text: &str) -> Result<u32> {
    if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(text));
    }
    part.parse().map_err(|_| invalid(text))
}

/// Parses a date in `YYYY-MM-DD` or `YYYYMMDD` form.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    if !text.is_ascii() {
        return Err(invalid(text));
    }
    let (year, month, day) = match text.len() {
        10 if text.as_bytes()[4] == b'-' && text.as_bytes()[7] == b'-' => {
            (&text[..4], &text[5..7], &text[8..10])
        }
        8 if text.bytes().all(|b| b.is_ascii_digit()) => (&text[..4], &text[4..6], &text[6..8]),
        _ => return Err(invalid(text)),
    };

    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(text));
    }
    let year: i32 = year.parse().map_err(|_| invalid(text))?;
    let month = two_digits(month, text)?;
    let day = two_digits(day, text)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(text))
}

/// Parses fractional seconds into nanoseconds (extra digits are truncated).
fn parse_fraction(fraction: &str, text: &str) -> Result<u32> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(text));
    }
    let mut digits: String = fraction.chars().take(9).collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    digits.parse().map_err(|_| invalid(text))
}

/// Parses a time of day without offset: `HH`, `HH:MM`, `HH:MM:SS[.f]`,
/// or the basic forms `HHMM`, `HHMMSS[.f]`.
pub fn parse_time(text: &str) -> Result<NaiveTime> {
    let (clock, nanos) = match text.find(['.', ',']) {
        Some(at) => (&text[..at], parse_fraction(&text[at + 1..], text)?),
        None => (text, 0),
    };

    let parts: Vec<&str> = if clock.contains(':') {
        clock.split(':').collect()
    } else if clock.len() % 2 == 0 && clock.is_ascii() {
        (0..clock.len())
            .step_by(2)
            .map(|at| &clock[at..at + 2])
            .collect()
    } else {
        return Err(invalid(text));
    };

    let (hour, minute, second) = match parts.as_slice() {
        [h] => (two_digits(h, text)?, 0, 0),
        [h, m] => (two_digits(h, text)?, two_digits(m, text)?, 0),
        [h, m, s] => (
            two_digits(h, text)?,
            two_digits(m, text)?,
            two_digits(s, text)?,
        ),
        _ => return Err(invalid(text)),
    };

    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or_else(|| invalid(text))
}

/// Parses a UTC offset: `Z`, `+HH`, `+HHMM` or `+HH:MM` (and `-` forms).
pub fn parse_offset(text: &str) -> Result<FixedOffset> {
    if !text.is_ascii() {
        return Err(invalid(text));
    }
    if text == "Z" || text == "z" {
        return FixedOffset::east_opt(0).ok_or_else(|| invalid(text));
    }

    let sign = match text.chars().next() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Err(invalid(text)),
    };
    let body = text[1..].replace(':', "");
    let (hours, minutes) = match body.len() {
        2 => (two_digits(&body, text)?, 0),
        4 => (two_digits(&body[..2], text)?, two_digits(&body[2..], text)?),
        _ => return Err(invalid(text)),
    };
    if hours > 23 || minutes > 59 {
        return Err(invalid(text));
    }

    let seconds = sign * (hours * 3600 + minutes * 60) as i32;
    FixedOffset::east_opt(seconds).ok_or_else(|| invalid(text))
}

/// Splits a trailing offset off a time-of-day string.
fn split_offset(text: &str) -> (&str, Option<&str>) {
    if let Some(clock) = text.strip_suffix(['Z', 'z']) {
        return (clock, Some(&text[clock.len()..]));
    }
    match text.rfind(['+', '-']) {
        Some(at) => (&text[..at], Some(&text[at..])),
        None => (text, None),
    }
}

/// Parses an instant, returning the local wall time and its offset, if any.
pub fn parse_datetime(text: &str) -> Result<(NaiveDateTime, Option<FixedOffset>)> {
    let (date, rest) = match text.find(['T', 't', ' ']) {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };
    let date = parse_date(date).map_err(|_| invalid(text))?;

    let Some(rest) = rest else {
        return Ok((date.and_time(NaiveTime::MIN), None));
    };

    let (clock, offset) = split_offset(rest);
    let time = parse_time(clock).map_err(|_| invalid(text))?;
    let offset = offset
        .map(parse_offset)
        .transpose()
        .map_err(|_| invalid(text))?;

    Ok((date.and_time(time), offset))
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(time: &NaiveTime) -> String {
    let micros = time.nanosecond() % 1_000_000_000 / 1_000;
    let clock = time.format("%H:%M:%S");
    if micros == 0 {
        clock.to_string()
    } else {
        format!("{clock}.{micros:06}")
    }
}

pub fn format_naive_datetime(instant: &NaiveDateTime) -> String {
    format!(
        "{}T{}",
        format_date(&instant.date()),
        format_time(&instant.time())
    )
}

pub fn format_datetime(instant: &DateTime<FixedOffset>) -> String {
    format!(
        "{}{}",
        format_naive_datetime(&instant.naive_local()),
        instant.format("%:z")
    )
}
