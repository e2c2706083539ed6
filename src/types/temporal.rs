//! ISO-8601 date and time coercers.

use super::{iso, Coerce};
use crate::core::{with_offset, Error, Result, Value};

/// An instant, aware or naive, parsed from ISO-8601 text.
///
/// Text without an offset stays naive unless a default offset is configured,
/// in which case the text is reparsed with that offset appended.
#[derive(Clone, Debug, Default)]
pub struct IsoDateTime {
    default_offset: Option<String>,
    name: Option<String>,
}

impl IsoDateTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset suffix (`Z`, `+01:00`, ...) applied to naive input text.
    pub fn with_default_offset(offset: impl Into<String>) -> Self {
        Self {
            default_offset: Some(offset.into()),
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn parse(text: &str) -> Result<Value> {
        let (instant, offset) = iso::parse_datetime(text)?;
        match offset {
            Some(offset) => with_offset(instant, offset)
                .map(Value::DateTime)
                .ok_or_else(|| Error::invalid(format!("Invalid isoformat string: '{text}'"))),
            None => Ok(Value::NaiveDateTime(instant)),
        }
    }
}

impl Coerce for IsoDateTime {
    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("ISODateTime")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        let text = match value {
            Value::DateTime(_) | Value::NaiveDateTime(_) => return Ok(value),
            Value::Str(text) => text,
            other => {
                return Err(Error::invalid(format!(
                    "fromisoformat: argument must be str, not {}",
                    other.kind()
                )))
            }
        };

        let parsed = Self::parse(&text)?;
        match (&parsed, &self.default_offset) {
            (Value::NaiveDateTime(_), Some(suffix)) => Self::parse(&format!("{text}{suffix}")),
            _ => Ok(parsed),
        }
    }
}

/// A calendar date. Full instants are accepted and truncated to their date.
#[derive(Clone, Debug, Default)]
pub struct IsoDate {
    name: Option<String>,
}

impl IsoDate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Coerce for IsoDate {
    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("ISODate")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        match value {
            Value::Date(_) => Ok(value),
            Value::NaiveDateTime(instant) => Ok(Value::Date(instant.date())),
            Value::DateTime(instant) => Ok(Value::Date(instant.date_naive())),
            Value::Str(text) => match iso::parse_date(&text) {
                Ok(date) => Ok(Value::Date(date)),
                Err(_) => iso::parse_datetime(&text).map(|(instant, _)| Value::Date(instant.date())),
            },
            other => Err(Error::invalid(format!(
                "fromisoformat: argument must be str, not {}",
                other.kind()
            ))),
        }
    }
}

/// A time of day without offset.
#[derive(Clone, Debug, Default)]
pub struct IsoTime {
    name: Option<String>,
}

impl IsoTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Coerce for IsoTime {
    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("ISOTime")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        match value {
            Value::Time(_) => Ok(value),
            Value::Str(text) => iso::parse_time(&text).map(Value::Time),
            other => Err(Error::invalid(format!(
                "fromisoformat: argument must be str, not {}",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    #[test]
    fn naive_text_stays_naive_without_default_offset() {
        let parsed = IsoDateTime::new()
            .coerce(Value::from("2023-01-01T12:12:12.123456"))
            .unwrap();
        assert!(matches!(parsed, Value::NaiveDateTime(_)));
        assert_eq!(parsed.to_json(), json!("2023-01-01T12:12:12.123456"));
    }

    #[test]
    fn default_offset_applies_to_naive_text() {
        let utc = IsoDateTime::with_default_offset("+00:00");
        let parsed = utc.coerce(Value::from("2023-01-01T12:12:12")).unwrap();
        assert_eq!(parsed.to_json(), json!("2023-01-01T12:12:12+00:00"));
    }

    #[test]
    fn explicit_offset_wins_over_default() {
        let utc = IsoDateTime::with_default_offset("Z");
        let parsed = utc.coerce(Value::from("2023-01-01T12:12:12+01:00")).unwrap();
        assert_eq!(parsed.to_json(), json!("2023-01-01T12:12:12+01:00"));
    }

    #[test]
    fn instants_are_idempotent() {
        let coercer = IsoDateTime::with_default_offset("Z");
        let once = coercer.coerce(Value::from("2024-01-20T12:00")).unwrap();
        assert_eq!(coercer.coerce(once.clone()).unwrap(), once);
    }

    #[test]
    fn malformed_offsets_are_errors() {
        for text in ["2024-01-01T12:00+1é1", "2024-01-01T12:00+é"] {
            assert!(IsoDateTime::new().coerce(Value::from(text)).is_err(), "{text}");
            assert!(IsoDate::new().coerce(Value::from(text)).is_err(), "{text}");
        }
    }

    #[test]
    fn non_text_is_rejected() {
        assert!(IsoDateTime::new().coerce(Value::from(12)).is_err());
        assert!(IsoDate::new().coerce(Value::Null).is_err());
        assert!(IsoTime::new().coerce(Value::from(true)).is_err());
    }

    #[test]
    fn date_falls_back_to_instant_text() {
        let date = IsoDate::new();
        let expected = Value::Date(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        assert_eq!(date.coerce(Value::from("2024-01-20")).unwrap(), expected);
        assert_eq!(date.coerce(Value::from("2024-01-20T10:11:12Z")).unwrap(), expected);
        assert!(date.coerce(Value::from("yesterday")).is_err());
    }

    #[test]
    fn time_parses_and_serializes() {
        let time = IsoTime::new();
        let parsed = time.coerce(Value::from("12:12:12")).unwrap();
        assert_eq!(parsed, Value::Time(NaiveTime::from_hms_opt(12, 12, 12).unwrap()));
        assert_eq!(time.serialize(&parsed), json!("12:12:12"));
    }
}
