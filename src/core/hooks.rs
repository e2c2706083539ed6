//! Per-record-type extension points.
//!
//! Hooks are plain closures wrapped in shareable handles. A record type may
//! define its own or inherit the nearest ancestor's.

use super::error::Result;
use super::value::Value;
use crate::record::Record;
use std::fmt;
use std::sync::Arc;

type ParseFn = dyn Fn(&str) -> Result<Value> + Send + Sync;
type CheckFn = dyn Fn(&Record) -> Result<()> + Send + Sync;

/// Transforms a lone string constructor argument into arguments.
///
/// Runs when the single argument is not JSON, or is JSON that decodes to a
/// plain string. A returned `Value::List` becomes positional arguments, a
/// `Value::Map` becomes keyword arguments, anything else a single positional.
///
/// # Example
///
/// ```rust
/// use recordkit::core::{ParseHook, Value};
///
/// let comma_separated = ParseHook::new(|text| {
///     Ok(Value::List(text.split(',').map(Value::from).collect()))
/// });
///
/// let parsed = comma_separated.parse("1,10").unwrap();
/// assert_eq!(parsed, Value::List(vec![Value::from("1"), Value::from("10")]));
/// ```
#[derive(Clone)]
pub struct ParseHook {
    parse: Arc<ParseFn>,
}

impl ParseHook {
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        ParseHook {
            parse: Arc::new(parse),
        }
    }

    pub fn parse(&self, text: &str) -> Result<Value> {
        (self.parse)(text)
    }
}

impl fmt::Debug for ParseHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParseHook")
    }
}

/// Post-construction check for cross-field invariants.
///
/// Runs last during construction, after every field has been coerced. An
/// error aborts construction.
#[derive(Clone)]
pub struct AfterInit {
    check: Arc<CheckFn>,
}

impl AfterInit {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Record) -> Result<()> + Send + Sync + 'static,
    {
        AfterInit {
            check: Arc::new(check),
        }
    }

    pub fn check(&self, record: &Record) -> Result<()> {
        (self.check)(record)
    }
}

impl fmt::Debug for AfterInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AfterInit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;

    #[test]
    fn parse_hook_is_deterministic() {
        let hook = ParseHook::new(|text| Ok(Value::from(text.to_uppercase())));

        assert_eq!(hook.parse("abc").unwrap(), Value::from("ABC"));
        assert_eq!(hook.parse("abc").unwrap(), hook.parse("abc").unwrap());
    }

    #[test]
    fn parse_hook_can_reject() {
        let hook = ParseHook::new(|_| Err(Error::invalid("no strings here")));

        assert_eq!(
            hook.parse("x").unwrap_err(),
            Error::Invalid("no strings here".to_string())
        );
    }

    #[test]
    fn hooks_are_cheap_to_clone() {
        let hook = ParseHook::new(|text| Ok(Value::from(text)));
        let cloned = hook.clone();
        assert!(Arc::ptr_eq(&hook.parse, &cloned.parse));
    }
}
