//! Field declarations and their classification into `FieldSpec`s.

use crate::core::{Error, Result, Value};
use crate::types::{resolve, Coercer, Shape};

/// What a field declaration says about its default and mutability.
///
/// | marker | required | read-only | default |
/// |---|---|---|---|
/// | `Absent` | yes | no | none |
/// | `ReadOnly` | yes | yes | none |
/// | `ReadOnlyDefault(v)` | no | yes | `v` |
/// | `Optional` | no | no | none |
/// | `OptionalReadOnly` | no | yes | none |
/// | `Default(v)` | no | no | `v` |
///
/// A `Default(Value::Null)` is treated like `Optional`. Literal values convert
/// straight into `Default`, so `builder.field("n", Shape::Int, 3)` works.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Marker {
    #[default]
    Absent,
    ReadOnly,
    ReadOnlyDefault(Value),
    Optional,
    OptionalReadOnly,
    Default(Value),
}

/// A read-only field with a default value.
pub fn read_only(value: impl Into<Value>) -> Marker {
    Marker::ReadOnlyDefault(value.into())
}

macro_rules! marker_from_literal {
    ($($literal:ty),* $(,)?) => {
        $(
            impl From<$literal> for Marker {
                fn from(value: $literal) -> Self {
                    Marker::Default(value.into())
                }
            }
        )*
    };
}

marker_from_literal!(bool, i32, i64, u32, f64, &str, String, Value);

impl<T: Into<Value>> From<Vec<T>> for Marker {
    fn from(values: Vec<T>) -> Self {
        Marker::Default(Value::from(values))
    }
}

/// Derived metadata for one record field. Immutable once classified.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    name: String,
    coercer: Coercer,
    is_required: bool,
    is_readonly: bool,
    is_constant: bool,
    default: Option<Value>,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    pub fn is_constant(&self) -> bool {
        self.is_constant
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Classify one declared field.
///
/// Constant fields take their coercer from the default value's own kind and
/// fail without a (non-null) default.
pub fn classify(name: &str, shape: &Shape, marker: &Marker) -> Result<FieldSpec> {
    let spec = |coercer, is_required, is_readonly, is_constant, default| FieldSpec {
        name: name.to_string(),
        coercer,
        is_required,
        is_readonly,
        is_constant,
        default,
    };

    if let Shape::Constant = shape {
        return match marker {
            Marker::Default(value) | Marker::ReadOnlyDefault(value) if !value.is_null() => {
                let coercer = resolve(&Shape::of_value(value));
                Ok(spec(coercer, false, true, true, Some(value.clone())))
            }
            _ => Err(Error::ConstantMissingDefault {
                name: name.to_string(),
            }),
        };
    }

    let coercer = resolve(shape);
    Ok(match marker {
        Marker::Absent => spec(coercer, true, false, false, None),
        Marker::ReadOnly => spec(coercer, true, true, false, None),
        Marker::ReadOnlyDefault(value) => spec(coercer, false, true, false, Some(value.clone())),
        Marker::Optional => spec(coercer, false, false, false, None),
        Marker::OptionalReadOnly => spec(coercer, false, true, false, None),
        Marker::Default(Value::Null) => spec(coercer, false, false, false, None),
        Marker::Default(value) => spec(coercer, false, false, false, Some(value.clone())),
    })
}
