use crate::core::Value;
use std::collections::BTreeMap;

/// Constructor arguments: positional values, keyword values and options.
///
/// ```rust
/// use recordkit::Args;
///
/// let args = Args::new().arg("ada").kw("score", 10).ignore_extra();
/// assert!(args.ignores_extra());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub(crate) positional: Vec<Value>,
    pub(crate) keywords: BTreeMap<String, Value>,
    ignore_extra: bool,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lone positional argument.
    pub fn single(value: impl Into<Value>) -> Self {
        Self::new().arg(value)
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kw(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    pub fn positional<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.positional.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn keywords<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.keywords
            .extend(values.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    /// Silently drop keywords that name no field.
    pub fn ignore_extra(mut self) -> Self {
        self.ignore_extra = true;
        self
    }

    pub fn ignores_extra(&self) -> bool {
        self.ignore_extra
    }

    /// The only argument, when there is exactly one positional and no keywords.
    pub fn single_value(&self) -> Option<&Value> {
        match self.positional.as_slice() {
            [value] if self.keywords.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Spread a decoded value: lists become positionals, maps keywords.
    pub(crate) fn spread(value: Value, ignore_extra: bool) -> Self {
        let args = match value {
            Value::List(items) => Self::new().positional(items),
            Value::Map(map) => Self::new().keywords(map),
            other => Self::single(other),
        };
        Self {
            ignore_extra,
            ..args
        }
    }
}

impl From<Value> for Args {
    fn from(value: Value) -> Self {
        Args::single(value)
    }
}

impl From<&str> for Args {
    fn from(text: &str) -> Self {
        Args::single(text)
    }
}

impl From<String> for Args {
    fn from(text: String) -> Self {
        Args::single(text)
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Args::new().positional(values)
    }
}

impl From<BTreeMap<String, Value>> for Args {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Args::new().keywords(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_needs_one_positional_only() {
        assert_eq!(Args::single(1).single_value(), Some(&Value::Int(1)));
        assert_eq!(Args::new().arg(1).arg(2).single_value(), None);
        assert_eq!(Args::single(1).kw("a", 2).single_value(), None);
        assert_eq!(Args::new().single_value(), None);
    }

    #[test]
    fn spread_by_shape() {
        let list = Args::spread(Value::from(vec![1, 2]), false);
        assert_eq!(list.positional, vec![Value::Int(1), Value::Int(2)]);

        let map = Args::spread(Value::from(serde_json::json!({"a": 1})), true);
        assert_eq!(map.keywords["a"], Value::Int(1));
        assert!(map.ignores_extra());

        let scalar = Args::spread(Value::from(3), false);
        assert_eq!(scalar.single_value(), Some(&Value::Int(3)));
    }
}
