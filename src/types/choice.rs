//! Enumerated and structured coercers: one-of, some-of and maps.

use super::Coerce;
use crate::core::{Error, Result, Value};

fn render_choices(choices: &[Value]) -> String {
    Value::List(choices.to_vec()).to_string()
}

/// Decode JSON text, leaving every other value alone.
fn decode_text(value: Value) -> Result<Value> {
    match value {
        Value::Str(text) => serde_json::from_str::<serde_json::Value>(&text)
            .map(Value::from)
            .map_err(|err| Error::invalid(err.to_string())),
        other => Ok(other),
    }
}

/// Value must be one of a fixed set of choices.
#[derive(Clone, Debug)]
pub struct OneOf {
    choices: Vec<Value>,
    name: Option<String>,
}

impl OneOf {
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for choice in choices.into_iter().map(Into::into) {
            if !unique.contains(&choice) {
                unique.push(choice);
            }
        }
        Self {
            choices: unique,
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn choices(&self) -> &[Value] {
        &self.choices
    }
}

impl Coerce for OneOf {
    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("OneOf")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        if self.choices.contains(&value) {
            Ok(value)
        } else {
            Err(Error::invalid(format!(
                "not in {}",
                render_choices(&self.choices)
            )))
        }
    }
}

/// A list of distinct values drawn from a fixed set of choices.
///
/// Accepts a native list or its JSON text, and serializes back to JSON text.
#[derive(Clone, Debug)]
pub struct SomeOf {
    choices: OneOf,
}

impl SomeOf {
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            choices: OneOf::new(choices),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.choices = self.choices.named(name);
        self
    }
}

impl Coerce for SomeOf {
    fn label(&self) -> &str {
        self.choices.name.as_deref().unwrap_or("SomeOf")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        let Value::List(items) = decode_text(value)? else {
            return Err(Error::invalid("not a list of values"));
        };

        for (at, item) in items.iter().enumerate() {
            if items[..at].contains(item) {
                return Err(Error::invalid("not a unique list of values"));
            }
        }
        if items.iter().any(|item| !self.choices.choices.contains(item)) {
            return Err(Error::invalid(format!(
                "not a subset of {}",
                render_choices(&self.choices.choices)
            )));
        }

        Ok(Value::List(items))
    }

    fn serialize(&self, value: &Value) -> serde_json::Value {
        serde_json::Value::String(value.to_json().to_string())
    }
}

/// An associative structure, accepted natively or as JSON object text.
///
/// Serializes back to JSON text.
#[derive(Clone, Debug, Default)]
pub struct Map {
    name: Option<String>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Coerce for Map {
    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Map")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        match decode_text(value)? {
            map @ Value::Map(_) => Ok(map),
            _ => Err(Error::invalid("not a map")),
        }
    }

    fn serialize(&self, value: &Value) -> serde_json::Value {
        serde_json::Value::String(value.to_json().to_string())
    }
}
