//! Error taxonomy for record construction, mutation and coercion.
//!
//! Every variant is a recoverable validation failure. Nothing in this crate
//! panics on bad input; callers receive one of these synchronously at the
//! point of construction or mutation.

use thiserror::Error;

/// Errors raised while deriving schemas, coercing values or mutating records.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// More positional arguments than declared fields.
    #[error("extra attribute(s): {}", .values.join(", "))]
    ExtraAttribute { values: Vec<String> },

    /// Same field supplied both positionally and by keyword.
    #[error("duplicate attribute: {name}")]
    DuplicateAttribute { name: String },

    /// Unknown field name referenced, or removal of a field that was never set.
    #[error("'{record}' object has no attribute '{name}'")]
    UndefinedAttribute { record: String, name: String },

    /// Required field missing at construction.
    #[error("missing required attribute: {name}")]
    RequiredAttribute { name: String },

    /// Mutation or deletion of a read-only field, or a constant supplied at construction.
    #[error("field '{name}' is read-only")]
    ReadOnlyField { name: String },

    /// A constant field declared without a usable default.
    #[error("Constant field '{name}' must have a default value")]
    ConstantMissingDefault { name: String },

    /// A field value rejected by its coercer.
    #[error("invalid <{label}> value ({value}) for field '{field}': {source}")]
    ValueCoercion {
        field: String,
        label: String,
        value: String,
        source: Box<Error>,
    },

    /// Reason reported by a coercer for a rejected value.
    #[error("{0}")]
    Invalid(String),

    /// Coercer configured with inconsistent bounds.
    #[error("{0}")]
    InvalidBounds(String),

    #[error("length must be at least {min}")]
    ListTooShort { min: usize },

    #[error("length must be no more than {max}")]
    ListTooLong { max: usize },

    #[error("{value} already in list")]
    ListDuplicate { value: String },

    /// Element coercion failure, annotated with the 1-based element position.
    #[error("position={position}, item={item}: {source}")]
    ListElement {
        position: usize,
        item: String,
        source: Box<Error>,
    },

    #[error("index {index} out of range for list of length {len}")]
    ListIndex { index: usize, len: usize },

    /// Range with no bounds, or with lower > upper.
    #[error("{0}")]
    RangeInvariant(String),

    /// Malformed range text (separator or bound).
    #[error("{0}")]
    RangeSyntax(String),

    /// A duration was mandatory in context but did not match the grammar.
    #[error("invalid duration value: {value}")]
    InvalidDuration { value: String },

    #[error("cannot compare {left} with {right}")]
    Incomparable { left: String, right: String },

    #[error("expecting a record instance")]
    NotARecord,
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::Invalid(reason.into())
    }

    /// Innermost error, looking through field and list-element annotations.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::ValueCoercion { source, .. } | Error::ListElement { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_message_names_field_and_label() {
        let err = Error::ValueCoercion {
            field: "attr_a".to_string(),
            label: "int".to_string(),
            value: "hello".to_string(),
            source: Box::new(Error::invalid("not an integer")),
        };

        assert_eq!(
            err.to_string(),
            "invalid <int> value (hello) for field 'attr_a': not an integer"
        );
    }

    #[test]
    fn extra_attribute_lists_values() {
        let err = Error::ExtraAttribute {
            values: vec!["2".to_string(), "3".to_string()],
        };
        assert_eq!(err.to_string(), "extra attribute(s): 2, 3");
    }

    #[test]
    fn root_cause_unwraps_nested_annotations() {
        let err = Error::ValueCoercion {
            field: "tags".to_string(),
            label: "List".to_string(),
            value: "[1]".to_string(),
            source: Box::new(Error::ListElement {
                position: 1,
                item: "1".to_string(),
                source: Box::new(Error::ListDuplicate {
                    value: "1".to_string(),
                }),
            }),
        };

        assert!(matches!(err.root_cause(), Error::ListDuplicate { .. }));
    }
}
