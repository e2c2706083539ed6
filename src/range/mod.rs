//! Ranges over ordered values, and the ISO-8601 duration machinery behind
//! the date and datetime flavours.
//!
//! Three record types are predeclared, each extending the previous one:
//! - `Range`: integer bounds, built from `"1,10"` style text;
//! - `ISODateTimeRange`: aware instants, built from ISO range text;
//! - `ISODateRange`: calendar dates, built from ISO range text.
//!
//! Every bound is optional, but at least one must be set and the lower bound
//! may not exceed the upper bound.
//!
//! # Example
//!
//! ```rust
//! use recordkit::range::Range;
//! use recordkit::{Args, Value};
//!
//! let range = Range::new(Args::new().arg(1).arg(10).kw("is_lower_exclusive", true)).unwrap();
//! assert!(!range.contains(&Value::from(1)).unwrap());
//! assert!(range.contains(&Value::from(10)).unwrap());
//!
//! let hour = Range::datetimes("20240120T12--PT1H").unwrap();
//! assert_eq!(
//!     hour.upper_bound().map(ToString::to_string).as_deref(),
//!     Some("2024-01-20T13:00:00+00:00")
//! );
//! ```

mod duration;
mod iso;

pub use duration::{
    add_duration, add_to_date, add_to_datetime, parse_duration, sub_duration, Duration,
};
pub use iso::{parse_iso_range, Resolution};

use crate::core::{Error, Result, Value};
use crate::record::{Args, Record, RecordType, RecordTypeRef};
use crate::schema::Marker;
use crate::types::{IsoDate, IsoDateTime, Shape};
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::OnceLock;

const LOWER: &str = "lower_bound";
const UPPER: &str = "upper_bound";

// Fixed declarations: names are non-empty and fields distinct, so `build` cannot fail.
static RANGE: OnceLock<RecordTypeRef> = OnceLock::new();
static ISO_DATETIME_RANGE: OnceLock<RecordTypeRef> = OnceLock::new();
static ISO_DATE_RANGE: OnceLock<RecordTypeRef> = OnceLock::new();

/// The integer `Range` record type.
pub fn range_type() -> RecordTypeRef {
    RANGE
        .get_or_init(|| {
            RecordType::builder("Range")
                .optional(LOWER, Shape::Int)
                .optional(UPPER, Shape::Int)
                .field("is_lower_exclusive", Shape::Bool, false)
                .field("is_upper_exclusive", Shape::Bool, false)
                .parse_string(|text| {
                    Ok(Value::List(
                        text.split(',').map(|part| Value::from(part.trim())).collect(),
                    ))
                })
                .after_init(check_bounds)
                .build()
                .expect("Range declaration is valid")
        })
        .clone()
}

/// `ISODateTimeRange`: aware instant bounds; naive text is taken as UTC.
pub fn iso_datetime_range_type() -> RecordTypeRef {
    ISO_DATETIME_RANGE
        .get_or_init(|| {
            RecordType::builder("ISODateTimeRange")
                .extends(&range_type())
                .field(LOWER, IsoDateTime::with_default_offset("Z"), Marker::Optional)
                .field(UPPER, IsoDateTime::with_default_offset("Z"), Marker::Optional)
                .parse_string(|text| bounds(text, Resolution::DateTime))
                .build()
                .expect("ISODateTimeRange declaration is valid")
        })
        .clone()
}

/// `ISODateRange`: calendar date bounds.
pub fn iso_date_range_type() -> RecordTypeRef {
    ISO_DATE_RANGE
        .get_or_init(|| {
            RecordType::builder("ISODateRange")
                .extends(&iso_datetime_range_type())
                .field(LOWER, IsoDate::new(), Marker::Optional)
                .field(UPPER, IsoDate::new(), Marker::Optional)
                .parse_string(|text| bounds(text, Resolution::Date))
                .build()
                .expect("ISODateRange declaration is valid")
        })
        .clone()
}

fn bounds(text: &str, resolution: Resolution) -> Result<Value> {
    let (lower, upper) = parse_iso_range(text, Utc::now(), resolution)?;
    Ok(Value::List(vec![lower, upper]))
}

fn check_bounds(record: &Record) -> Result<()> {
    match (record.get(LOWER), record.get(UPPER)) {
        (None, None) => Err(Error::RangeInvariant(
            "lower_bound or upper_bound must be assigned".to_string(),
        )),
        (Some(lower), Some(upper)) => match lower.compare(upper) {
            Some(Ordering::Greater) => Err(Error::RangeInvariant(
                "lower_bound cannot be greater than upper_bound".to_string(),
            )),
            Some(_) => Ok(()),
            None => Err(incomparable(lower, upper)),
        },
        _ => Ok(()),
    }
}

fn incomparable(left: &Value, right: &Value) -> Error {
    Error::Incomparable {
        left: left.to_string(),
        right: right.to_string(),
    }
}

/// A constructed range record with typed accessors.
#[derive(Clone, Debug, PartialEq)]
pub struct Range {
    record: Record,
}

impl Range {
    /// Build an integer range.
    pub fn new(args: impl Into<Args>) -> Result<Self> {
        Self::from_record(range_type().construct(args)?)
    }

    /// Build a range of aware instants.
    pub fn datetimes(args: impl Into<Args>) -> Result<Self> {
        Self::from_record(iso_datetime_range_type().construct(args)?)
    }

    /// Build a range of dates.
    pub fn dates(args: impl Into<Args>) -> Result<Self> {
        Self::from_record(iso_date_range_type().construct(args)?)
    }

    /// Wrap a record whose type is `Range` or one of its subtypes.
    pub fn from_record(record: Record) -> Result<Self> {
        if !record.record_type().is_subtype_of(&range_type()) {
            return Err(Error::invalid(format!(
                "expecting a Range record, not {}",
                record.type_name()
            )));
        }
        Ok(Range { record })
    }

    pub fn lower_bound(&self) -> Option<&Value> {
        self.record.get(LOWER)
    }

    pub fn upper_bound(&self) -> Option<&Value> {
        self.record.get(UPPER)
    }

    pub fn is_lower_exclusive(&self) -> bool {
        self.flag("is_lower_exclusive")
    }

    pub fn is_upper_exclusive(&self) -> bool {
        self.flag("is_upper_exclusive")
    }

    fn flag(&self, name: &str) -> bool {
        self.record
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Test membership, honoring exclusivity per side. Unset bounds impose
    /// no constraint.
    ///
    /// The value is first normalized by the bound's coercer, so text such as
    /// `"2024-01-20"` is accepted for date ranges. A value that cannot be
    /// ordered against a bound is an error.
    pub fn contains(&self, value: &Value) -> Result<bool> {
        let value = self.normalize(value);

        if let Some(lower) = self.lower_bound() {
            let ordering = value
                .compare(lower)
                .ok_or_else(|| incomparable(&value, lower))?;
            let below = match self.is_lower_exclusive() {
                true => ordering != Ordering::Greater,
                false => ordering == Ordering::Less,
            };
            if below {
                return Ok(false);
            }
        }

        if let Some(upper) = self.upper_bound() {
            let ordering = value
                .compare(upper)
                .ok_or_else(|| incomparable(&value, upper))?;
            let above = match self.is_upper_exclusive() {
                true => ordering != Ordering::Less,
                false => ordering == Ordering::Greater,
            };
            if above {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn normalize(&self, value: &Value) -> Value {
        self.record
            .schema()
            .get(LOWER)
            .and_then(|field| field.coercer().coerce(value.clone()).ok())
            .unwrap_or_else(|| value.clone())
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn serialize(&self) -> serde_json::Value {
        self.record.serialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> Value {
        Value::from(Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap())
    }

    fn ints(lower: i64, upper: i64, lower_exclusive: bool, upper_exclusive: bool) -> Range {
        Range::new(
            Args::new()
                .arg(lower)
                .arg(upper)
                .arg(lower_exclusive)
                .arg(upper_exclusive),
        )
        .unwrap()
    }

    #[test]
    fn contains_honors_exclusivity() {
        let cases = [
            (false, false, 1, true),
            (true, false, 1, false),
            (false, false, 10, true),
            (false, true, 10, false),
            (false, false, 5, true),
            (false, false, 11, false),
            (false, false, 0, false),
        ];
        for (lower_exclusive, upper_exclusive, value, expected) in cases {
            let range = ints(1, 10, lower_exclusive, upper_exclusive);
            assert_eq!(
                range.contains(&Value::from(value)).unwrap(),
                expected,
                "{value} in {range:?}"
            );
        }
    }

    #[test]
    fn unset_bounds_are_unconstrained() {
        let at_least = Range::new(Args::new().kw("lower_bound", 3)).unwrap();
        assert!(at_least.upper_bound().is_none());
        assert!(at_least.contains(&Value::from(i64::MAX)).unwrap());
        assert!(!at_least.contains(&Value::from(2)).unwrap());

        let at_most = Range::new(Args::new().kw("upper_bound", 3)).unwrap();
        assert!(at_most.contains(&Value::from(i64::MIN)).unwrap());
    }

    #[test]
    fn range_needs_a_bound() {
        let err = Range::new(Args::new()).unwrap_err();
        assert_eq!(
            err,
            Error::RangeInvariant("lower_bound or upper_bound must be assigned".to_string())
        );
    }

    #[test]
    fn range_bounds_must_be_ordered() {
        let err = Range::new(Args::new().arg(10).arg(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "lower_bound cannot be greater than upper_bound"
        );
        assert!(Range::new(Args::new().arg(4).arg(4)).is_ok());
    }

    #[test]
    fn integer_ranges_parse_comma_separated_text() {
        let range = Range::new("1,10").unwrap();
        assert_eq!(range.lower_bound(), Some(&Value::Int(1)));
        assert_eq!(range.upper_bound(), Some(&Value::Int(10)));

        let spaced = Range::new(" 1 , 10 , true").unwrap();
        assert!(spaced.is_lower_exclusive());
        assert!(!spaced.is_upper_exclusive());
    }

    #[test]
    fn datetime_ranges_parse_iso_text() {
        let range = Range::datetimes("20240120T12--PT1H").unwrap();
        assert_eq!(range.lower_bound(), Some(&utc(2024, 1, 20, 12)));
        assert_eq!(range.upper_bound(), Some(&utc(2024, 1, 20, 13)));

        let range = Range::datetimes("PT1H/20240120T12").unwrap();
        assert_eq!(range.lower_bound(), Some(&utc(2024, 1, 20, 11)));

        assert!(range.contains(&Value::from("2024-01-20T11:30:00Z")).unwrap());
        assert!(!range.contains(&Value::from("2024-01-20T12:30:00Z")).unwrap());
    }

    #[test]
    fn datetime_ranges_assume_utc_for_naive_keywords() {
        let range = Range::datetimes(
            Args::new()
                .kw("lower_bound", "2024-01-20T12:00:00")
                .kw("upper_bound", "2024-01-20T14:00:00+01:00"),
        )
        .unwrap();
        assert_eq!(range.lower_bound(), Some(&utc(2024, 1, 20, 12)));
        assert_eq!(range.upper_bound(), Some(&utc(2024, 1, 20, 13)));
    }

    #[test]
    fn date_ranges_parse_iso_text() {
        let cases = [
            ("20240120--P0YT1H", date(2024, 1, 20), date(2024, 1, 20)),
            ("P1YT1H/20240120", date(2023, 1, 20), date(2024, 1, 20)),
            ("20231225--20240120", date(2023, 12, 25), date(2024, 1, 20)),
        ];
        for (text, lower, upper) in cases {
            let range = Range::dates(text).unwrap();
            assert_eq!(range.lower_bound(), Some(&lower), "{text}");
            assert_eq!(range.upper_bound(), Some(&upper), "{text}");
        }
    }

    #[test]
    fn empty_sides_collapse_to_now() {
        let range = Range::dates("/").unwrap();
        assert_eq!(range.lower_bound(), range.upper_bound());

        let range = Range::datetimes("/").unwrap();
        assert_eq!(range.lower_bound(), range.upper_bound());
    }

    #[test]
    fn double_durations_span_both_sides_of_now() {
        let range = Range::dates("P1D/P1D").unwrap();
        let (Some(Value::Date(lower)), Some(Value::Date(upper))) =
            (range.lower_bound(), range.upper_bound())
        else {
            panic!("expected date bounds");
        };
        assert_eq!((*upper - *lower).num_days(), 2);

        let range = Range::datetimes("PT1H/PT1H").unwrap();
        let (Some(Value::DateTime(lower)), Some(Value::DateTime(upper))) =
            (range.lower_bound(), range.upper_bound())
        else {
            panic!("expected instant bounds");
        };
        assert_eq!((*upper - *lower).num_hours(), 2);
    }

    #[test]
    fn malformed_range_text_fails() {
        assert!(matches!(
            Range::datetimes("2024-01-20").unwrap_err(),
            Error::RangeSyntax(_)
        ));
        assert!(matches!(
            Range::dates("20240120/P").unwrap_err(),
            Error::InvalidDuration { .. }
        ));
        assert!(matches!(
            Range::datetimes("2024-01-01T12:00+1é1/PT1H").unwrap_err(),
            Error::RangeSyntax(_)
        ));
        assert!(matches!(
            Range::datetimes("20240120--PT1H").unwrap_err(),
            Error::RangeSyntax(_)
        ));
    }

    #[test]
    fn incomparable_values_are_errors() {
        let range = ints(1, 10, false, false);
        assert!(matches!(
            range.contains(&Value::from("abc")).unwrap_err(),
            Error::Incomparable { .. }
        ));
    }

    #[test]
    fn range_types_form_a_chain() {
        assert!(iso_date_range_type().is_subtype_of(&iso_datetime_range_type()));
        assert!(iso_datetime_range_type().is_subtype_of(&range_type()));

        let names: Vec<String> = iso_date_range_type()
            .schema()
            .unwrap()
            .names()
            .map(str::to_string)
            .collect();
        assert_eq!(
            names,
            [
                "lower_bound",
                "upper_bound",
                "is_lower_exclusive",
                "is_upper_exclusive"
            ]
        );
    }

    #[test]
    fn ranges_serialize_through_their_coercers() {
        let range = Range::dates("20231225--20240120").unwrap();
        assert_eq!(
            range.serialize(),
            json!({
                "lower_bound": "2023-12-25",
                "upper_bound": "2024-01-20",
                "is_lower_exclusive": 0,
                "is_upper_exclusive": 0
            })
        );
    }

    #[test]
    fn foreign_records_are_rejected() {
        let other = RecordType::builder("Other")
            .optional("lower_bound", Shape::Int)
            .build()
            .unwrap();
        let record = other.construct(Args::new()).unwrap();
        assert!(Range::from_record(record).is_err());
    }
}
