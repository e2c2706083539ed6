//! Schema derivation: field classification, inheritance merge and caching.
//!
//! A record type's schema is computed once, on first use, by walking its
//! inheritance linearization from the most basic type to the type itself and
//! merging each type's own field contribution. Later types override earlier
//! ones field by field; fields a type does not redeclare are inherited as-is.

mod deriver;
mod field;

pub use deriver::{linearize, SchemaRegistry};
pub use field::{classify, read_only, FieldSpec, Marker};

use std::collections::HashMap;
use std::sync::Arc;

/// Ordered mapping of field name to `FieldSpec` for one record type.
#[derive(Clone, Debug, Default)]
pub struct RecordSchema {
    fields: Vec<Arc<FieldSpec>>,
    index: HashMap<String, usize>,
}

impl RecordSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<FieldSpec>> {
        self.index.get(name).map(|&at| &self.fields[at])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<FieldSpec>> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name())
    }

    /// Insert a field, replacing a same-named one in place.
    pub(crate) fn upsert(&mut self, field: Arc<FieldSpec>) {
        match self.index.get(field.name()) {
            Some(&at) => self.fields[at] = field,
            None => {
                self.index.insert(field.name().to_string(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    /// Insert a field at the end, dropping any same-named field first.
    pub(crate) fn push_last(&mut self, field: Arc<FieldSpec>) {
        if let Some(at) = self.index.remove(field.name()) {
            self.fields.remove(at);
            for position in self.index.values_mut() {
                if *position > at {
                    *position -= 1;
                }
            }
        }
        self.upsert(field);
    }

    /// Overlay every field of `other`; `other` wins on name clashes.
    pub(crate) fn merge(&mut self, other: &RecordSchema) {
        for field in &other.fields {
            self.upsert(field.clone());
        }
    }
}
