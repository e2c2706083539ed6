//! Recordkit: schema-driven record validation and serialization
//!
//! Record types declare their fields once; every construction and mutation
//! then runs through typed coercers that validate and normalize the values.
//! Schemas merge across inheritance chains, with the most derived
//! declaration winning.
//!
//! # Core Concepts
//!
//! - **Record types**: declared with [`RecordType::builder`] or [`record_type!`]
//! - **Coercers**: validate and normalize one field's values via the [`Coerce`] trait
//! - **Bounded lists**: list fields that keep length and uniqueness invariants
//! - **Ranges**: integer, date and datetime ranges with ISO-8601 range text
//!
//! # Example
//!
//! ```rust
//! use recordkit::list::List;
//! use recordkit::types::Integer;
//! use recordkit::{read_only, Args, RecordType, Shape, Value};
//!
//! let sensor = RecordType::builder("Sensor")
//!     .required("id", Shape::Str)
//!     .field("reading", Integer::new().min(0).max(100).force(), 0)
//!     .field("kind", Shape::Str, read_only("thermal"))
//!     .optional("tags", List::new(Shape::Str).unique())
//!     .build()
//!     .unwrap();
//!
//! let mut record = sensor
//!     .construct(Args::new().arg("s-1").kw("reading", 140).kw("tags", vec!["roof"]))
//!     .unwrap();
//! assert_eq!(record.get("reading"), Some(&Value::Int(100)));
//!
//! assert!(record.set("kind", "optical").is_err());
//! assert!(record.list_mut("tags").unwrap().push(Value::from("roof")).is_err());
//!
//! let copy = sensor.from_json(&record.serialize()).unwrap();
//! assert_eq!(copy, record);
//! ```

pub mod builder;
pub mod core;
pub mod list;
pub mod range;
pub mod record;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use builder::{BuildError, RecordTypeBuilder};
pub use self::core::{AfterInit, Error, ParseHook, Result, Value};
pub use list::{BoundedList, List};
pub use range::{parse_duration, Duration, Range};
pub use record::{serialize, Args, Record, RecordType, RecordTypeRef};
pub use schema::{read_only, FieldSpec, Marker, RecordSchema, SchemaRegistry};
pub use types::{Coerce, Coercer, Shape};
