use super::List;
use crate::core::{Error, Result, Value};
use std::ops::{Bound, Index, RangeBounds};

/// An ordered sequence of coerced elements, bound to its `List`'s constraints.
///
/// Every mutator validates before touching the store, so a rejected
/// operation leaves the list unchanged.
#[derive(Clone, Debug)]
pub struct BoundedList {
    list: List,
    store: Vec<Value>,
}

impl BoundedList {
    /// Build a list from a native sequence or its JSON text.
    pub fn new(list: List, value: Value) -> Result<Self> {
        let value = match value {
            Value::Str(text) => Value::from_json_text(&text).unwrap_or(Value::Str(text)),
            other => other,
        };
        let items = match value {
            Value::List(items) => items,
            Value::Items(items) => items.store,
            _ => return Err(Error::invalid("expecting a list")),
        };

        if list.min() > 0 && items.len() < list.min() {
            return Err(Error::ListTooShort { min: list.min() });
        }
        if list.max() > 0 && items.len() > list.max() {
            return Err(Error::ListTooLong { max: list.max() });
        }

        let mut bounded = Self {
            list,
            store: Vec::with_capacity(items.len()),
        };
        for (position, item) in items.into_iter().enumerate() {
            let rendered = item.to_string();
            bounded.push(item).map_err(|source| Error::ListElement {
                position: position + 1,
                item: rendered,
                source: Box::new(source),
            })?;
        }

        Ok(bounded)
    }

    pub fn list(&self) -> &List {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.store.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.store.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.store
    }

    /// Position of the first element equal to `value`.
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.store.iter().position(|item| item == value)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.store.len() {
            Ok(())
        } else {
            Err(Error::ListIndex {
                index,
                len: self.store.len(),
            })
        }
    }

    /// Replace the element at `index`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        self.check_index(index)?;
        let value = self.list.element().coerce(value)?;

        if !self.list.allows_duplicates() {
            let taken = self
                .store
                .iter()
                .enumerate()
                .any(|(at, item)| at != index && *item == value);
            if taken {
                return Err(Error::ListDuplicate {
                    value: value.to_string(),
                });
            }
        }

        self.store[index] = value;
        Ok(())
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        self.check_index(index)?;
        let min = self.list.min();
        if min > 0 && self.store.len() - 1 < min {
            return Err(Error::ListTooShort { min });
        }
        Ok(self.store.remove(index))
    }

    /// Remove and return a range of elements.
    pub fn remove_range(&mut self, range: impl RangeBounds<usize>) -> Result<Vec<Value>> {
        let len = self.store.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(Error::ListIndex {
                index: start.max(end),
                len,
            });
        }

        let min = self.list.min();
        if min > 0 {
            let mut preflight = vec![(); len];
            preflight.drain(start..end);
            if preflight.len() < min {
                return Err(Error::ListTooShort { min });
            }
        }

        Ok(self.store.drain(start..end).collect())
    }

    /// Append one element.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let max = self.list.max();
        if max > 0 && self.store.len() >= max {
            return Err(Error::ListTooLong { max });
        }

        let value = self.list.element().coerce(value)?;
        if !self.list.allows_duplicates() && self.store.contains(&value) {
            return Err(Error::ListDuplicate {
                value: value.to_string(),
            });
        }

        self.store.push(value);
        Ok(())
    }

    /// Render each element through the element coercer.
    pub fn serialize(&self) -> serde_json::Value {
        let element = self.list.element();
        serde_json::Value::Array(self.store.iter().map(|item| element.serialize(item)).collect())
    }
}

impl PartialEq for BoundedList {
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store
    }
}

impl PartialEq<Vec<Value>> for BoundedList {
    fn eq(&self, other: &Vec<Value>) -> bool {
        &self.store == other
    }
}

impl PartialEq<[Value]> for BoundedList {
    fn eq(&self, other: &[Value]) -> bool {
        self.store == other
    }
}

impl Index<usize> for BoundedList {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.store[index]
    }
}

impl<'a> IntoIterator for &'a BoundedList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.iter()
    }
}
