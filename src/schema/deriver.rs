use super::field::classify;
use super::{FieldSpec, Marker, RecordSchema};
use crate::core::Result;
use crate::record::{RecordTypeId, RecordTypeRef};
use crate::types::Shape;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Order a type's inheritance graph from the most basic type to the type itself.
///
/// Depth-first: each type visits its direct bases in reverse declaration order
/// before itself, and a type is kept only at its first visit. Among sibling
/// bases the rightmost comes first, so the leftmost base wins a merge.
pub fn linearize(record_type: &RecordTypeRef) -> Vec<RecordTypeRef> {
    fn visit(
        record_type: &RecordTypeRef,
        seen: &mut HashSet<RecordTypeId>,
        order: &mut Vec<RecordTypeRef>,
    ) {
        if !seen.insert(record_type.id()) {
            return;
        }
        for base in record_type.bases().iter().rev() {
            visit(base, seen, order);
        }
        order.push(record_type.clone());
    }

    let mut order = Vec::new();
    visit(record_type, &mut HashSet::new(), &mut order);
    order
}

#[derive(Default)]
struct RegistryState {
    /// Each type's own declarations, classified.
    contributions: HashMap<RecordTypeId, Arc<RecordSchema>>,
    /// Fully merged schemas, keyed by the type they were derived for.
    schemas: HashMap<RecordTypeId, Arc<RecordSchema>>,
}

/// Memoizing cache of record schemas, keyed by record type identity.
///
/// Schemas are computed outside the lock and published with
/// first-writer-wins semantics, so concurrent first use of a type is safe
/// and every caller observes the same schema.
#[derive(Default)]
pub struct SchemaRegistry {
    state: Mutex<RegistryState>,
}

static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();

impl SchemaRegistry {
    /// An empty registry, independent of the global one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by record construction.
    pub fn global() -> &'static SchemaRegistry {
        GLOBAL.get_or_init(SchemaRegistry::new)
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The merged schema of `record_type`, deriving it on first request.
    pub fn schema(&self, record_type: &RecordTypeRef) -> Result<Arc<RecordSchema>> {
        if let Some(schema) = self.cached(record_type) {
            return Ok(schema);
        }

        let mut merged = RecordSchema::new();
        for class in linearize(record_type) {
            let contribution = self.contribution(&class)?;
            merged.merge(&contribution);
        }

        let mut state = self.lock();
        let schema = state
            .schemas
            .entry(record_type.id())
            .or_insert_with(|| Arc::new(merged));
        Ok(schema.clone())
    }

    /// The schema of `record_type`, if it was already derived.
    pub fn cached(&self, record_type: &RecordTypeRef) -> Option<Arc<RecordSchema>> {
        self.lock().schemas.get(&record_type.id()).cloned()
    }

    pub fn is_derived(&self, record_type: &RecordTypeRef) -> bool {
        self.lock().schemas.contains_key(&record_type.id())
    }

    /// Whether the type's own declarations have been classified.
    pub fn has_contribution(&self, record_type: &RecordTypeRef) -> bool {
        self.lock().contributions.contains_key(&record_type.id())
    }

    /// Classify a type's own declarations once and cache the result.
    fn contribution(&self, record_type: &RecordTypeRef) -> Result<Arc<RecordSchema>> {
        let cached = self.lock().contributions.get(&record_type.id()).cloned();
        if let Some(contribution) = cached {
            return Ok(contribution);
        }

        let mut own = RecordSchema::new();
        for decl in record_type.declarations() {
            own.upsert(Arc::new(classify(decl.name(), decl.shape(), decl.marker())?));
        }

        let mut state = self.lock();
        let contribution = state
            .contributions
            .entry(record_type.id())
            .or_insert_with(|| Arc::new(own));
        Ok(contribution.clone())
    }

    /// Add a field to an already declared type.
    ///
    /// The field goes last; a same-named field is replaced and loses its old
    /// position. Subtypes derived later inherit it. Returns the updated schema.
    pub fn add_field(
        &self,
        record_type: &RecordTypeRef,
        name: &str,
        shape: impl Into<Shape>,
        marker: impl Into<Marker>,
    ) -> Result<Arc<RecordSchema>> {
        let field: Arc<FieldSpec> = Arc::new(classify(name, &shape.into(), &marker.into())?);
        let derived = self.schema(record_type)?;
        let own = self.contribution(record_type)?;

        let mut state = self.lock();
        let contribution = state.contributions.entry(record_type.id()).or_insert(own);
        Arc::make_mut(contribution).push_last(field.clone());

        let schema = state.schemas.entry(record_type.id()).or_insert(derived);
        Arc::make_mut(schema).push_last(field);
        Ok(schema.clone())
    }
}
