//! Builder API for declaring record types.
//!
//! Record types are declared explicitly, either through the fluent
//! [`RecordTypeBuilder`] or the [`record_type!`](crate::record_type) macro.
//! Both only collect declarations; schemas are derived on first use.

pub mod error;
pub mod macros;
pub mod record;

pub use error::BuildError;
pub use record::RecordTypeBuilder;
