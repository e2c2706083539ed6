//! Coercer wrapping a record type, for record-valued fields.

use super::Coerce;
use crate::core::{Result, Value};
use crate::record::{Args, Record, RecordTypeRef};

/// Builds nested records from raw field values.
///
/// A single argument is interpreted by shape: an instance of the wrapped type
/// (or a subtype) passes through, a map is spread as keyword fields, and a
/// list is spread as positional fields. Anything else goes to the wrapped
/// type's constructor unchanged.
#[derive(Clone, Debug)]
pub struct Nested {
    record_type: RecordTypeRef,
}

impl Nested {
    pub fn new(record_type: RecordTypeRef) -> Self {
        Self { record_type }
    }

    pub fn record_type(&self) -> &RecordTypeRef {
        &self.record_type
    }

    /// Construct (or pass through) a record of the wrapped type.
    pub fn call(&self, args: Args) -> Result<Record> {
        let spread = match args.single_value() {
            Some(Value::Record(record)) if record.record_type().is_subtype_of(&self.record_type) => {
                return Ok(record.clone());
            }
            Some(Value::Map(map)) => Args::new().keywords(map.clone()),
            Some(Value::List(items)) => Args::new().positional(items.clone()),
            Some(Value::Items(items)) => Args::new().positional(items.iter().cloned()),
            _ => return self.record_type.construct(args),
        };
        self.record_type.construct(carry_options(&args, spread))
    }
}

fn carry_options(from: &Args, spread: Args) -> Args {
    if from.ignores_extra() {
        spread.ignore_extra()
    } else {
        spread
    }
}

impl Coerce for Nested {
    fn label(&self) -> &str {
        self.record_type.name()
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        self.call(Args::single(value)).map(Value::Record)
    }

    fn serialize(&self, value: &Value) -> serde_json::Value {
        match value {
            Value::Record(record) => record.serialize(),
            other => other.to_json(),
        }
    }
}
