//! Coercion registry: declared field shapes and the coercers they resolve to.
//!
//! A coercer validates and normalizes raw input for one field, and renders
//! normalized values back to primitive data. Every coercer is idempotent:
//! re-coercing a normalized value returns it unchanged.
//!
//! # Example
//!
//! ```rust
//! use recordkit::types::{resolve, Coerce, Integer, Shape};
//! use recordkit::Value;
//!
//! let int = resolve(&Shape::Int);
//! assert_eq!(int.coerce(Value::from("-12")).unwrap(), Value::Int(-12));
//!
//! let clamped = Integer::new().min(5).max(15).force();
//! assert_eq!(clamped.coerce(Value::from(20)).unwrap(), Value::Int(15));
//! assert_eq!(clamped.coerce(Value::from(0)).unwrap(), Value::Int(5));
//! ```

mod choice;
pub mod iso;
mod nested;
mod scalar;
mod temporal;

pub use choice::{Map, OneOf, SomeOf};
pub use nested::Nested;
pub use scalar::{Boolean, Float, Integer, Passthrough, Text};
pub use temporal::{IsoDate, IsoDateTime, IsoTime};

use crate::core::{Result, Value};
use crate::list::List;
use crate::record::{Record, RecordTypeRef};
use std::fmt::Debug;
use std::sync::Arc;

/// Validator/normalizer for one field's value shape.
pub trait Coerce: Debug + Send + Sync {
    /// Label used in error messages, e.g. `int` or a custom name.
    fn label(&self) -> &str;

    /// Validate and normalize a raw value.
    fn coerce(&self, value: Value) -> Result<Value>;

    /// Render a normalized value as primitive data.
    fn serialize(&self, value: &Value) -> serde_json::Value {
        value.to_json()
    }
}

/// Shared handle to a coercer.
pub type Coercer = Arc<dyn Coerce>;

/// The declared shape of a field, before resolution to a coercer.
#[derive(Clone, Debug)]
pub enum Shape {
    /// No recognized shape; values pass through untouched.
    Any,
    Int,
    Float,
    Str,
    Bool,
    /// A nested record type.
    Record(RecordTypeRef),
    /// A bounded list, which is already a coercer.
    List(List),
    /// Any ready-made coercer.
    Coercer(Coercer),
    /// A constant: its coercer is inferred from the field's default.
    Constant,
}

impl Shape {
    /// Wrap a coercer instance as a shape.
    pub fn coercer(coercer: impl Coerce + 'static) -> Self {
        Shape::Coercer(Arc::new(coercer))
    }

    /// Infer a shape from a value's native kind.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Int(_) => Shape::Int,
            Value::Float(_) => Shape::Float,
            Value::Str(_) => Shape::Str,
            Value::Bool(_) => Shape::Bool,
            Value::Record(record) => Shape::Record(record.record_type().clone()),
            _ => Shape::Any,
        }
    }
}

/// Resolve a declared shape into its coercer.
///
/// Built-in kinds get default (unbounded) scalar coercers, record types are
/// wrapped in [`Nested`], lists and coercers are used as-is, and anything
/// unrecognized passes values through.
pub fn resolve(shape: &Shape) -> Coercer {
    match shape {
        Shape::Int => Arc::new(Integer::new()),
        Shape::Float => Arc::new(Float::new()),
        Shape::Str => Arc::new(Text::new()),
        Shape::Bool => Arc::new(Boolean::new()),
        Shape::Record(record_type) => Arc::new(Nested::new(record_type.clone())),
        Shape::List(list) => Arc::new(list.clone()),
        Shape::Coercer(coercer) => coercer.clone(),
        Shape::Any | Shape::Constant => Arc::new(Passthrough),
    }
}

macro_rules! shape_from_coercer {
    ($($coercer:ty),* $(,)?) => {
        $(
            impl From<$coercer> for Shape {
                fn from(coercer: $coercer) -> Self {
                    Shape::Coercer(Arc::new(coercer))
                }
            }
        )*
    };
}

shape_from_coercer!(
    Passthrough,
    Integer,
    Float,
    Text,
    Boolean,
    IsoDateTime,
    IsoDate,
    IsoTime,
    OneOf,
    SomeOf,
    Map,
    Nested,
);

impl From<Coercer> for Shape {
    fn from(coercer: Coercer) -> Self {
        Shape::Coercer(coercer)
    }
}

impl From<List> for Shape {
    fn from(list: List) -> Self {
        Shape::List(list)
    }
}

impl From<RecordTypeRef> for Shape {
    fn from(record_type: RecordTypeRef) -> Self {
        Shape::Record(record_type)
    }
}

impl From<&RecordTypeRef> for Shape {
    fn from(record_type: &RecordTypeRef) -> Self {
        Shape::Record(record_type.clone())
    }
}

/// A record instance stands for its own type.
impl From<&Record> for Shape {
    fn from(record: &Record) -> Self {
        Shape::Record(record.record_type().clone())
    }
}
