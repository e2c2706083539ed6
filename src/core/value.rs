//! Dynamic value model shared by raw input and normalized field values.

use crate::list::BoundedList;
use crate::record::Record;
use crate::types::iso;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value as Json;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A raw or normalized value.
///
/// Raw input arrives as primitives, sequences and maps (often decoded from
/// JSON). Coercers turn those into normalized values, which may also be
/// temporal values, bounded lists or nested records.
///
/// An unset field is never represented by a `Value`: records simply have no
/// entry for it. `Null` is an explicit absence marker supplied by a caller.
///
/// # Example
///
/// ```rust
/// use recordkit::Value;
///
/// let raw = Value::from(serde_json::json!({"name": "ada", "tags": [1, 2]}));
/// assert!(matches!(raw, Value::Map(_)));
/// assert_eq!(Value::from(7).to_json(), serde_json::json!(7));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Date(NaiveDate),
    Time(NaiveTime),
    /// An instant without offset information.
    NaiveDateTime(NaiveDateTime),
    DateTime(DateTime<FixedOffset>),
    /// A list produced by a `List` coercer.
    Items(BoundedList),
    Record(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(number) => Some(*number),
            Value::Int(number) => Some(*number as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&BoundedList> {
        match self {
            Value::Items(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::NaiveDateTime(_) | Value::DateTime(_) => "datetime",
            Value::Items(_) => "List",
            Value::Record(_) => "record",
        }
    }

    /// Decode JSON text into a value, or `None` if the text is not JSON.
    pub fn from_json_text(text: &str) -> Option<Value> {
        serde_json::from_str::<Json>(text).ok().map(Value::from)
    }

    /// Render as primitive data. Temporal values become ISO-8601 text.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(flag) => Json::Bool(*flag),
            Value::Int(number) => Json::from(*number),
            Value::Float(number) => serde_json::Number::from_f64(*number)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Str(text) => Json::String(text.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Date(date) => Json::String(iso::format_date(date)),
            Value::Time(time) => Json::String(iso::format_time(time)),
            Value::NaiveDateTime(instant) => Json::String(iso::format_naive_datetime(instant)),
            Value::DateTime(instant) => Json::String(iso::format_datetime(instant)),
            Value::Items(items) => items.serialize(),
            Value::Record(record) => record.serialize(),
        }
    }

    /// Order two values of comparable kinds.
    ///
    /// Numbers compare with numbers, text with text, and temporal values with
    /// values of the same kind. Aware and naive instants never compare.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::NaiveDateTime(a), Value::NaiveDateTime(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Int(number) => write!(f, "{number}"),
            Value::Float(number) => write!(f, "{number:?}"),
            Value::Str(text) => f.write_str(text),
            Value::Date(date) => f.write_str(&iso::format_date(date)),
            Value::Time(time) => f.write_str(&iso::format_time(time)),
            Value::NaiveDateTime(instant) => f.write_str(&iso::format_naive_datetime(instant)),
            Value::DateTime(instant) => f.write_str(&iso::format_datetime(instant)),
            Value::Record(record) => write!(f, "{record}"),
            Value::List(_) | Value::Map(_) | Value::Items(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Int(number.into())
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Int(number)
    }
}

impl From<u32> for Value {
    fn from(number: u32) -> Self {
        Value::Int(number.into())
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Str(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Str(text)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::Date(date)
    }
}

impl From<NaiveTime> for Value {
    fn from(time: NaiveTime) -> Self {
        Value::Time(time)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(instant: NaiveDateTime) -> Self {
        Value::NaiveDateTime(instant)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Value::DateTime(instant)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(instant: DateTime<Utc>) -> Self {
        Value::DateTime(instant.fixed_offset())
    }
}

impl From<BoundedList> for Value {
    fn from(items: BoundedList) -> Self {
        Value::Items(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(flag) => Value::Bool(flag),
            Json::Number(number) => match number.as_i64() {
                Some(integer) => Value::Int(integer),
                None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(text) => Value::Str(text),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Attach `offset` to a naive instant.
pub(crate) fn with_offset(instant: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&instant).single()
}
