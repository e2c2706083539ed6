//! Build errors for record type declarations.

use thiserror::Error;

/// Errors that can occur when declaring a record type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("Record type name not specified. Pass a non-empty name to RecordType::builder")]
    MissingName,

    #[error("Field name must not be empty")]
    EmptyFieldName,

    #[error("Field '{name}' declared twice. Each field may be declared once per type")]
    DuplicateField { name: String },
}
