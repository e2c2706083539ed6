//! Builder for declaring record types.

use crate::builder::error::BuildError;
use crate::core::{AfterInit, ParseHook, Result, Value};
use crate::record::{FieldDecl, Record, RecordType, RecordTypeRef};
use crate::schema::Marker;
use crate::types::Shape;
use std::collections::HashSet;

/// Builder for record types with a fluent API.
///
/// Collects raw `(name, shape, marker)` declarations; classification into
/// field specs happens later, on the type's first schema derivation.
pub struct RecordTypeBuilder {
    name: String,
    bases: Vec<RecordTypeRef>,
    fields: Vec<FieldDecl>,
    parse_string: Option<ParseHook>,
    after_init: Option<AfterInit>,
}

impl RecordTypeBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            parse_string: None,
            after_init: None,
        }
    }

    /// Add a base type. Bases are kept in declaration order.
    pub fn extends(mut self, base: &RecordTypeRef) -> Self {
        self.bases.push(base.clone());
        self
    }

    /// Declare a field with an explicit default marker.
    pub fn field(
        mut self,
        name: impl Into<String>,
        shape: impl Into<Shape>,
        marker: impl Into<Marker>,
    ) -> Self {
        self.fields.push(FieldDecl::new(name, shape, marker));
        self
    }

    /// Declare a required field with no default.
    pub fn required(self, name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        self.field(name, shape, Marker::Absent)
    }

    /// Declare an optional field with no default.
    pub fn optional(self, name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        self.field(name, shape, Marker::Optional)
    }

    /// Declare a constant field fixed to `value`.
    pub fn constant(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field(name, Shape::Constant, Marker::Default(value.into()))
    }

    /// Transform a lone string constructor argument (optional).
    pub fn parse_string<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.parse_string = Some(ParseHook::new(parse));
        self
    }

    /// Check cross-field invariants after construction (optional).
    pub fn after_init<F>(mut self, check: F) -> Self
    where
        F: Fn(&Record) -> Result<()> + Send + Sync + 'static,
    {
        self.after_init = Some(AfterInit::new(check));
        self
    }

    /// Build the record type.
    /// Returns an error if the name is empty or a field is declared twice.
    pub fn build(self) -> std::result::Result<RecordTypeRef, BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::MissingName);
        }

        let mut seen = HashSet::new();
        for decl in &self.fields {
            if decl.name().is_empty() {
                return Err(BuildError::EmptyFieldName);
            }
            if !seen.insert(decl.name()) {
                return Err(BuildError::DuplicateField {
                    name: decl.name().to_string(),
                });
            }
        }

        Ok(RecordType::new(
            self.name,
            self.bases,
            self.fields,
            self.parse_string,
            self.after_init,
        ))
    }
}
