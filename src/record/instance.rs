use super::{Args, RecordTypeRef};
use crate::core::{Error, Result, Value};
use crate::list::BoundedList;
use crate::schema::{FieldSpec, RecordSchema, SchemaRegistry};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One record instance.
///
/// Holds a value only for fields that are required, defaulted or explicitly
/// set. Every write goes through the field's coercer; read-only fields can
/// only be written at construction.
#[derive(Clone)]
pub struct Record {
    record_type: RecordTypeRef,
    snapshot: Arc<RecordSchema>,
    values: HashMap<String, Value>,
}

impl Record {
    pub(crate) fn construct(record_type: &RecordTypeRef, args: Args) -> Result<Record> {
        let schema = record_type.schema()?;
        let args = Self::adjust(record_type, args)?;
        let ignore_extra = args.ignores_extra();
        let Args {
            positional,
            mut keywords,
            ..
        } = args;

        if positional.len() > schema.len() {
            return Err(Error::ExtraAttribute {
                values: positional[schema.len()..]
                    .iter()
                    .map(Value::to_string)
                    .collect(),
            });
        }

        for (value, name) in positional.into_iter().zip(schema.names()) {
            if keywords.contains_key(name) {
                return Err(Error::DuplicateAttribute {
                    name: name.to_string(),
                });
            }
            keywords.insert(name.to_string(), value);
        }

        if !ignore_extra {
            if let Some(name) = keywords.keys().find(|name| !schema.contains(name)) {
                return Err(Error::UndefinedAttribute {
                    record: record_type.name().to_string(),
                    name: name.clone(),
                });
            }
        }

        for field in schema.iter() {
            let supplied = keywords.contains_key(field.name());
            if field.is_required() && !field.has_default() && !supplied {
                return Err(Error::RequiredAttribute {
                    name: field.name().to_string(),
                });
            }
            if field.is_constant() && supplied {
                return Err(Error::ReadOnlyField {
                    name: field.name().to_string(),
                });
            }
            if let (Some(default), false) = (field.default(), supplied) {
                keywords.insert(field.name().to_string(), default.clone());
            }
        }

        let mut record = Record {
            record_type: record_type.clone(),
            snapshot: schema.clone(),
            values: HashMap::with_capacity(schema.len()),
        };
        for field in schema.iter() {
            if let Some(value) = keywords.remove(field.name()) {
                record.store(field, value)?;
            }
        }

        if let Some(hook) = record_type.after_init_hook() {
            hook.check(&record)?;
        }
        Ok(record)
    }

    /// Reinterpret a lone string argument as JSON, or through the parse hook.
    fn adjust(record_type: &RecordTypeRef, args: Args) -> Result<Args> {
        let text = match args.single_value() {
            Some(Value::Str(text)) => text.clone(),
            _ => return Ok(args),
        };

        let decoded = match Value::from_json_text(&text) {
            Some(Value::Str(inner)) => Self::parse_text(record_type, inner)?,
            Some(other) => other,
            None => Self::parse_text(record_type, text)?,
        };
        Ok(Args::spread(decoded, args.ignores_extra()))
    }

    fn parse_text(record_type: &RecordTypeRef, text: String) -> Result<Value> {
        match record_type.parse_hook() {
            Some(hook) => hook.parse(&text),
            None => Ok(Value::Str(text)),
        }
    }

    /// Coerce and store, or drop the field for an explicit null on a
    /// non-required field.
    fn store(&mut self, field: &FieldSpec, value: Value) -> Result<()> {
        if !field.is_required() && value.is_null() {
            self.values.remove(field.name());
            return Ok(());
        }

        let rendered = value.to_string();
        let coercer = field.coercer();
        let normalized = coercer
            .coerce(value)
            .map_err(|source| Error::ValueCoercion {
                field: field.name().to_string(),
                label: coercer.label().to_string(),
                value: rendered,
                source: Box::new(source),
            })?;
        self.values.insert(field.name().to_string(), normalized);
        Ok(())
    }

    fn undefined(&self, name: &str) -> Error {
        Error::UndefinedAttribute {
            record: self.record_type.name().to_string(),
            name: name.to_string(),
        }
    }

    /// Field spec for a writable field.
    fn writable(&self, schema: &RecordSchema, name: &str) -> Result<Arc<FieldSpec>> {
        let field = schema.get(name).ok_or_else(|| self.undefined(name))?;
        if field.is_readonly() {
            return Err(Error::ReadOnlyField {
                name: name.to_string(),
            });
        }
        Ok(field.clone())
    }

    pub fn record_type(&self) -> &RecordTypeRef {
        &self.record_type
    }

    pub fn type_name(&self) -> &str {
        self.record_type.name()
    }

    /// Current schema of the record's type, including fields added after
    /// this record was built.
    pub fn schema(&self) -> Arc<RecordSchema> {
        SchemaRegistry::global()
            .cached(&self.record_type)
            .unwrap_or_else(|| self.snapshot.clone())
    }

    /// Value of a set field; `None` when unset or unknown.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Like [`get`](Self::get), but an unknown field name is an error.
    pub fn try_get(&self, name: &str) -> Result<Option<&Value>> {
        if !self.schema().contains(name) {
            return Err(self.undefined(name));
        }
        Ok(self.values.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Coerce and assign a field. Null on a non-required field unsets it.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let schema = self.schema();
        let field = self.writable(&schema, name)?;
        self.store(&field, value.into())
    }

    /// Unset a field, returning its value.
    pub fn delete(&mut self, name: &str) -> Result<Value> {
        let schema = self.schema();
        self.writable(&schema, name)?;
        self.values.remove(name).ok_or_else(|| self.undefined(name))
    }

    /// In-place access to a list-valued field.
    pub fn list_mut(&mut self, name: &str) -> Result<&mut BoundedList> {
        let schema = self.schema();
        self.writable(&schema, name)?;
        let undefined = self.undefined(name);
        match self.values.get_mut(name) {
            Some(Value::Items(items)) => Ok(items),
            Some(_) => Err(Error::invalid(format!("field '{name}' does not hold a list"))),
            None => Err(undefined),
        }
    }

    /// Set fields in schema order.
    pub fn fields(&self) -> Vec<(&str, &Value)> {
        self.schema()
            .names()
            .filter_map(|name| self.values.get_key_value(name))
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }

    /// Render set fields, in schema order, through their coercers.
    pub fn serialize(&self) -> serde_json::Value {
        let schema = self.schema();
        let mut out = serde_json::Map::new();
        for field in schema.iter() {
            if let Some(value) = self.values.get(field.name()) {
                out.insert(field.name().to_string(), field.coercer().serialize(value));
            }
        }
        serde_json::Value::Object(out)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.record_type.id() == other.record_type.id() && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type", &self.record_type.name())
            .field("values", &self.values)
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name(), self.serialize())
    }
}

impl serde::Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&Record::serialize(self), serializer)
    }
}
