//! Record types and the instance membrane.
//!
//! A [`RecordType`] is an immutable declaration: a name, its base types, its
//! own field declarations and optional hooks. Its schema is derived lazily
//! through the global [`SchemaRegistry`](crate::schema::SchemaRegistry).
//! A [`Record`] is one instance, holding only the fields that are set.
//!
//! # Example
//!
//! ```rust
//! use recordkit::{read_only, Args, RecordType, Shape};
//!
//! let person = RecordType::builder("Person")
//!     .required("name", Shape::Str)
//!     .field("age", Shape::Int, read_only(0))
//!     .optional("nickname", Shape::Str)
//!     .build()
//!     .unwrap();
//!
//! let mut ada = person.construct(Args::new().arg("Ada").kw("age", "36")).unwrap();
//! assert_eq!(ada.get("age").and_then(|v| v.as_int()), Some(36));
//! assert!(ada.get("nickname").is_none());
//!
//! assert!(ada.set("age", 37).is_err());
//! ada.set("nickname", "Countess").unwrap();
//! assert_eq!(
//!     ada.serialize(),
//!     serde_json::json!({"name": "Ada", "age": 36, "nickname": "Countess"})
//! );
//! ```

mod args;
mod instance;

pub use args::Args;
pub use instance::Record;

use crate::builder::RecordTypeBuilder;
use crate::core::{AfterInit, Error, ParseHook, Result, Value};
use crate::schema::{linearize, Marker, RecordSchema, SchemaRegistry};
use crate::types::Shape;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared handle to a record type.
pub type RecordTypeRef = Arc<RecordType>;

/// Identity of a record type, unique for the life of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordTypeId(u64);

impl RecordTypeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        RecordTypeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One raw field declaration: name, declared shape and default marker.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    name: String,
    shape: Shape,
    marker: Marker,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>, marker: impl Into<Marker>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
            marker: marker.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }
}

/// A declared record type.
pub struct RecordType {
    id: RecordTypeId,
    name: String,
    bases: Vec<RecordTypeRef>,
    declarations: Vec<FieldDecl>,
    parse_string: Option<ParseHook>,
    after_init: Option<AfterInit>,
}

impl RecordType {
    pub(crate) fn new(
        name: String,
        bases: Vec<RecordTypeRef>,
        declarations: Vec<FieldDecl>,
        parse_string: Option<ParseHook>,
        after_init: Option<AfterInit>,
    ) -> RecordTypeRef {
        Arc::new(Self {
            id: RecordTypeId::next(),
            name,
            bases,
            declarations,
            parse_string,
            after_init,
        })
    }

    /// Start declaring a record type.
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder::new(name)
    }

    pub fn id(&self) -> RecordTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[RecordTypeRef] {
        &self.bases
    }

    /// This type's own declarations, excluding inherited ones.
    pub fn declarations(&self) -> &[FieldDecl] {
        &self.declarations
    }

    /// Whether `self` is `other` or inherits from it.
    pub fn is_subtype_of(&self, other: &RecordType) -> bool {
        self.id == other.id || self.bases.iter().any(|base| base.is_subtype_of(other))
    }

    /// Types in schema merge order, ending with this one.
    pub fn linearization(self: &Arc<Self>) -> Vec<RecordTypeRef> {
        linearize(self)
    }

    /// Merged schema from the global registry.
    pub fn schema(self: &Arc<Self>) -> Result<Arc<RecordSchema>> {
        SchemaRegistry::global().schema(self)
    }

    /// String-argument hook of this type or its nearest ancestor.
    pub(crate) fn parse_hook(self: &Arc<Self>) -> Option<ParseHook> {
        linearize(self)
            .iter()
            .rev()
            .find_map(|ty| ty.parse_string.clone())
    }

    /// Post-construction hook of this type or its nearest ancestor.
    pub(crate) fn after_init_hook(self: &Arc<Self>) -> Option<AfterInit> {
        linearize(self)
            .iter()
            .rev()
            .find_map(|ty| ty.after_init.clone())
    }

    /// Construct an instance.
    pub fn construct(self: &Arc<Self>, args: impl Into<Args>) -> Result<Record> {
        Record::construct(self, args.into())
    }

    /// Construct from primitive data: objects give keywords, arrays give
    /// positionals, anything else a single positional.
    pub fn from_json(self: &Arc<Self>, json: &serde_json::Value) -> Result<Record> {
        let args = match json {
            serde_json::Value::String(text) => Args::single(text.as_str()),
            other => Args::spread(Value::from(other.clone()), false),
        };
        self.construct(args)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field(
                "bases",
                &self.bases.iter().map(|base| base.name()).collect::<Vec<_>>(),
            )
            .field("declarations", &self.declarations)
            .finish()
    }
}

/// Serialize a record value, failing for anything else.
pub fn serialize(value: &Value) -> Result<serde_json::Value> {
    match value {
        Value::Record(record) => Ok(record.serialize()),
        _ => Err(Error::NotARecord),
    }
}
