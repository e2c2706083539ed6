//! Bounded lists: a `List` coercer and the `BoundedList` values it produces.
//!
//! A `List` pairs an element coercer with length bounds and an optional
//! uniqueness constraint. Coercing a value through it yields a fresh
//! [`BoundedList`] that keeps enforcing those constraints on every mutation.
//!
//! # Example
//!
//! ```rust
//! use recordkit::list::{BoundedList, List};
//! use recordkit::types::Shape;
//! use recordkit::Value;
//!
//! let tags = List::new(Shape::Int).min_length(1).max_length(3).unique();
//! let mut items = BoundedList::new(tags, Value::from("[1, 2]")).unwrap();
//!
//! items.push(Value::from("3")).unwrap();
//! assert!(items.push(Value::from(4)).is_err());
//! assert_eq!(items, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
//! ```

mod bounded;

pub use bounded::BoundedList;

use crate::core::{Result, Value};
use crate::types::{resolve, Coerce, Coercer, Shape};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct ListBounds {
    element: Coercer,
    min_length: usize,
    max_length: usize,
    allow_duplicates: bool,
    name: Option<String>,
}

/// Coercer producing [`BoundedList`] values.
///
/// A length bound of zero means unchecked.
#[derive(Clone, Debug)]
pub struct List {
    bounds: Arc<ListBounds>,
}

impl List {
    /// List of elements of the given shape, unbounded and allowing duplicates.
    pub fn new(element: impl Into<Shape>) -> Self {
        Self {
            bounds: Arc::new(ListBounds {
                element: resolve(&element.into()),
                min_length: 0,
                max_length: 0,
                allow_duplicates: true,
                name: None,
            }),
        }
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        Arc::make_mut(&mut self.bounds).min_length = min_length;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        Arc::make_mut(&mut self.bounds).max_length = max_length;
        self
    }

    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        Arc::make_mut(&mut self.bounds).allow_duplicates = allow;
        self
    }

    /// Shorthand for `allow_duplicates(false)`.
    pub fn unique(self) -> Self {
        self.allow_duplicates(false)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.bounds).name = Some(name.into());
        self
    }

    pub fn element(&self) -> &Coercer {
        &self.bounds.element
    }

    pub(crate) fn min(&self) -> usize {
        self.bounds.min_length
    }

    pub(crate) fn max(&self) -> usize {
        self.bounds.max_length
    }

    pub(crate) fn allows_duplicates(&self) -> bool {
        self.bounds.allow_duplicates
    }
}

impl Coerce for List {
    fn label(&self) -> &str {
        self.bounds.name.as_deref().unwrap_or("List")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        BoundedList::new(self.clone(), value).map(Value::Items)
    }

    fn serialize(&self, value: &Value) -> serde_json::Value {
        match value {
            Value::Items(items) => items.serialize(),
            other => other.to_json(),
        }
    }
}
