//! Scalar coercers: passthrough, integer, float, text and boolean.

use super::Coerce;
use crate::core::{Error, Result, Value};
use regex::Regex;
use std::sync::OnceLock;

static INTEGER_TEXT: OnceLock<Regex> = OnceLock::new();
static FLOAT_TEXT: OnceLock<Regex> = OnceLock::new();

fn integer_text() -> &'static Regex {
    INTEGER_TEXT.get_or_init(|| Regex::new(r"^[-+]?[0-9]+$").expect("integer pattern is valid"))
}

fn float_text() -> &'static Regex {
    FLOAT_TEXT.get_or_init(|| {
        Regex::new(r"^[-+]?([0-9]+|\.[0-9]+|[0-9]+\.[0-9]*)$").expect("float pattern is valid")
    })
}

/// Accepts any value unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Coerce for Passthrough {
    fn label(&self) -> &str {
        "any"
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        Ok(value)
    }
}

/// Signed integer with optional bounds.
///
/// Accepts integers and text of the form `[+-]digits`. Booleans are rejected
/// even though they look numeric. With `force`, out-of-bound values clamp to
/// the nearest bound instead of failing.
#[derive(Clone, Debug, Default)]
pub struct Integer {
    min: Option<i64>,
    max: Option<i64>,
    force: bool,
    name: Option<String>,
}

impl Integer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, minimum: i64) -> Self {
        self.min = Some(minimum);
        self
    }

    pub fn max(mut self, maximum: i64) -> Self {
        self.max = Some(maximum);
        self
    }

    /// Clamp out-of-bound values instead of rejecting them.
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Coerce for Integer {
    fn label(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None if self.min.is_none() && self.max.is_none() => "int",
            None => "Integer",
        }
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        let mut number = match &value {
            Value::Int(number) => *number,
            Value::Str(text) if integer_text().is_match(text) => text
                .parse::<i64>()
                .map_err(|_| Error::invalid("not an integer"))?,
            _ => return Err(Error::invalid("not an integer")),
        };

        if let Some(min) = self.min {
            if number < min {
                if !self.force {
                    return Err(Error::invalid(format!("not >= {min}")));
                }
                number = min;
            }
        }
        if let Some(max) = self.max {
            if number > max {
                if !self.force {
                    return Err(Error::invalid(format!("not <= {max}")));
                }
                number = max;
            }
        }

        Ok(Value::Int(number))
    }
}

/// Floating point number with optional, independently exclusive bounds.
#[derive(Clone, Debug, Default)]
pub struct Float {
    min: Option<f64>,
    max: Option<f64>,
    exclusive_min: bool,
    exclusive_max: bool,
    name: Option<String>,
}

impl Float {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, minimum: f64) -> Self {
        self.min = Some(minimum);
        self
    }

    pub fn max(mut self, maximum: f64) -> Self {
        self.max = Some(maximum);
        self
    }

    pub fn exclusive_min(mut self) -> Self {
        self.exclusive_min = true;
        self
    }

    pub fn exclusive_max(mut self) -> Self {
        self.exclusive_max = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Coerce for Float {
    fn label(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None if self.min.is_none() && self.max.is_none() => "float",
            None => "Float",
        }
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        let number = match &value {
            Value::Int(number) => *number as f64,
            Value::Float(number) if number.is_finite() => *number,
            Value::Str(text) if float_text().is_match(text) => text
                .parse::<f64>()
                .map_err(|_| Error::invalid("not a float"))?,
            _ => return Err(Error::invalid("not a float")),
        };

        if let Some(min) = self.min {
            if self.exclusive_min && number <= min {
                return Err(Error::invalid(format!("not > {min:?}")));
            }
            if number < min {
                return Err(Error::invalid(format!("not >= {min:?}")));
            }
        }
        if let Some(max) = self.max {
            if self.exclusive_max && number >= max {
                return Err(Error::invalid(format!("not < {max:?}")));
            }
            if number > max {
                return Err(Error::invalid(format!("not <= {max:?}")));
            }
        }

        Ok(Value::Float(number))
    }
}

/// Text with optional length bounds, counted in characters.
///
/// Any input is stringified first, so `Text` never rejects a value's kind;
/// only its length.
#[derive(Clone, Debug, Default)]
pub struct Text {
    min_length: usize,
    max_length: Option<usize>,
    name: Option<String>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text bounded to `min_length..=max_length` characters.
    ///
    /// Fails when `min_length` is negative or `max_length < min_length`.
    pub fn with_lengths(min_length: i64, max_length: Option<i64>) -> Result<Self> {
        let min = usize::try_from(min_length).map_err(|_| {
            Error::InvalidBounds("min_length must be greater than or equal to zero".to_string())
        })?;
        let max = match max_length {
            Some(max) if max < min_length => {
                return Err(Error::InvalidBounds(format!(
                    "max_length must be greater than {min}"
                )))
            }
            Some(max) => Some(usize::try_from(max).unwrap_or(usize::MAX)),
            None => None,
        };

        Ok(Self {
            min_length: min,
            max_length: max,
            name: None,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Coerce for Text {
    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("str")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        let text = match value {
            Value::Str(text) => text,
            other => other.to_string(),
        };

        let length = text.chars().count();
        if length < self.min_length {
            return Err(Error::invalid(format!(
                "is shorter than the minimum length ({})",
                self.min_length
            )));
        }
        if let Some(max) = self.max_length {
            if length > max {
                return Err(Error::invalid(format!(
                    "is longer than the maximum length ({max})"
                )));
            }
        }

        Ok(Value::Str(text))
    }
}

/// Boolean accepting `true`/`false` text (any case), `1`/`0` and native booleans.
///
/// Serializes to `1` / `0`.
#[derive(Clone, Debug, Default)]
pub struct Boolean {
    name: Option<String>,
}

impl Boolean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Coerce for Boolean {
    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("bool")
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        let flag = match &value {
            Value::Bool(flag) => *flag,
            Value::Int(1) => true,
            Value::Int(0) => false,
            Value::Float(number) if *number == 1.0 => true,
            Value::Float(number) if *number == 0.0 => false,
            Value::Str(text) => match text.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => return Err(Error::invalid("not a boolean")),
            },
            _ => return Err(Error::invalid("not a boolean")),
        };
        Ok(Value::Bool(flag))
    }

    fn serialize(&self, value: &Value) -> serde_json::Value {
        match value {
            Value::Bool(flag) => serde_json::Value::from(u8::from(*flag)),
            other => other.to_json(),
        }
    }
}
