//! Core value model, error taxonomy and extension hooks.
//!
//! Everything else in the crate speaks in terms of these types:
//! - `Value` for raw input and normalized field values
//! - `Error` for every validation failure
//! - `ParseHook` / `AfterInit` for per-record-type customisation

mod error;
mod hooks;
mod value;

pub use error::{Error, Result};
pub use hooks::{AfterInit, ParseHook};
pub use value::Value;

pub(crate) use value::with_offset;
