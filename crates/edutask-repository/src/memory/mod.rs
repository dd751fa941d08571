//! In-process document store.
//!
//! Mirrors the server's behavior closely enough to run the data access and
//! controller layers without a MongoDB instance: collections come into
//! existence on first insert or explicit creation, schemas and unique fields
//! are enforced on every write, and reads return documents in insertion
//! order. A unique field holding an array is indexed per element, so two
//! documents clash when they share any one element.

pub mod query;

use crate::schema::SchemaDescriptor;
use crate::traits::{DocumentDatabase, DocumentStore, UpdateOutcome};
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use edutask_core::{EdutaskError, EdutaskResult, RecordId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Name of the database reported in error messages.
const MEMORY_DATABASE_NAME: &str = "memory";

#[derive(Debug, Default)]
struct CollectionState {
    exists: bool,
    schema: Option<SchemaDescriptor>,
    documents: Vec<Document>,
}

/// A collection held in memory.
#[derive(Debug)]
pub struct InMemoryStore {
    name: String,
    state: RwLock<CollectionState>,
}

impl InMemoryStore {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(CollectionState::default()),
        }
    }

    /// True once the collection has been created or written to.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.state.read().exists
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn duplicate_key(&self, field: &str, value: &Bson) -> EdutaskError {
        EdutaskError::DuplicateKey(format!(
            "E11000 duplicate key error collection: {}.{} index: {}_1 dup key: {{ {}: {} }}",
            MEMORY_DATABASE_NAME, self.name, field, field, value
        ))
    }

    /// Checks schema and uniqueness of `candidate` against every document
    /// except the one at `skip`.
    fn check_write(
        &self,
        state: &CollectionState,
        candidate: &Document,
        skip: Option<usize>,
    ) -> EdutaskResult<()> {
        if let Some(schema) = &state.schema {
            schema.validate(candidate)?;
        }

        let others = || {
            state
                .documents
                .iter()
                .enumerate()
                .filter(move |(i, _)| Some(*i) != skip)
                .map(|(_, d)| d)
        };

        if let Some(id) = candidate.get("_id") {
            if others().any(|d| d.get("_id") == Some(id)) {
                return Err(self.duplicate_key("_id", id));
            }
        }

        if let Some(schema) = &state.schema {
            for field in &schema.unique_fields {
                let value = query::get_path(candidate, field).unwrap_or(&Bson::Null);
                let keys = index_keys(value);
                let clash = others().find_map(|d| {
                    let existing = query::get_path(d, field).unwrap_or(&Bson::Null);
                    index_keys(existing)
                        .into_iter()
                        .find(|e| keys.iter().any(|k| query::values_equal(e, k)))
                        .cloned()
                });
                if let Some(key) = clash {
                    return Err(self.duplicate_key(field, &key));
                }
            }
        }
        Ok(())
    }

    fn position(state: &CollectionState, id: RecordId) -> Option<usize> {
        let id = Bson::ObjectId(id.into_inner());
        state.documents.iter().position(|d| d.get("_id") == Some(&id))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, mut document: Document) -> EdutaskResult<RecordId> {
        let id = match document.get("_id").cloned() {
            None => {
                let oid = ObjectId::new();
                let mut with_id = Document::new();
                with_id.insert("_id", oid);
                for (key, value) in document {
                    with_id.insert(key, value);
                }
                document = with_id;
                RecordId(oid)
            }
            Some(Bson::ObjectId(oid)) => RecordId(oid),
            Some(other) => {
                return Err(EdutaskError::invalid_input(format!(
                    "only object ids are supported as _id, got {other}"
                )))
            }
        };

        let mut state = self.state.write();
        self.check_write(&state, &document, None)?;
        state.exists = true;
        state.documents.push(document);
        debug!(collection = %self.name, %id, "inserted document");
        Ok(id)
    }

    async fn find_by_id(&self, id: RecordId) -> EdutaskResult<Option<Document>> {
        let state = self.state.read();
        Ok(Self::position(&state, id).map(|i| state.documents[i].clone()))
    }

    async fn find(&self, filter: Document) -> EdutaskResult<Vec<Document>> {
        let state = self.state.read();
        let mut found = Vec::new();
        for document in &state.documents {
            if query::matches(document, &filter)? {
                found.push(document.clone());
            }
        }
        Ok(found)
    }

    async fn update_one(&self, id: RecordId, update: Document) -> EdutaskResult<UpdateOutcome> {
        let mut state = self.state.write();
        let Some(index) = Self::position(&state, id) else {
            // The server still rejects malformed updates when nothing matches.
            let mut probe = Document::new();
            query::apply_update(&mut probe, &update)?;
            return Ok(UpdateOutcome::default());
        };

        let mut updated = state.documents[index].clone();
        query::apply_update(&mut updated, &update)?;

        if updated == state.documents[index] {
            return Ok(UpdateOutcome {
                matched: 1,
                modified: 0,
            });
        }

        self.check_write(&state, &updated, Some(index))?;
        state.documents[index] = updated;
        Ok(UpdateOutcome {
            matched: 1,
            modified: 1,
        })
    }

    async fn delete_one(&self, id: RecordId) -> EdutaskResult<u64> {
        let mut state = self.state.write();
        match Self::position(&state, id) {
            Some(index) => {
                state.documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn drop_collection(&self) -> EdutaskResult<()> {
        let mut state = self.state.write();
        *state = CollectionState::default();
        debug!(collection = %self.name, "dropped collection");
        Ok(())
    }
}

/// A set of in-memory collections.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    collections: RwLock<BTreeMap<String, Arc<InMemoryStore>>>,
}

impl InMemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the concrete store behind a collection name.
    #[must_use]
    pub fn store(&self, name: &str) -> Arc<InMemoryStore> {
        if let Some(store) = self.collections.read().get(name) {
            return Arc::clone(store);
        }
        let mut collections = self.collections.write();
        Arc::clone(
            collections
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(InMemoryStore::new(name))),
        )
    }
}

#[async_trait]
impl DocumentDatabase for InMemoryDatabase {
    async fn list_collection_names(&self) -> EdutaskResult<Vec<String>> {
        Ok(self
            .collections
            .read()
            .iter()
            .filter(|(_, store)| store.exists())
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn create_collection(&self, name: &str, schema: &SchemaDescriptor) -> EdutaskResult<()> {
        let store = self.store(name);
        let mut state = store.state.write();
        if state.exists {
            return Err(EdutaskError::Database(format!(
                "[48] Collection {MEMORY_DATABASE_NAME}.{name} already exists."
            )));
        }
        state.exists = true;
        state.schema = Some(schema.clone());
        Ok(())
    }

    fn collection(&self, name: &str) -> Arc<dyn DocumentStore> {
        self.store(name)
    }
}

/// Index keys a value contributes: each element of a non-empty array,
/// otherwise the value itself.
fn index_keys(value: &Bson) -> Vec<&Bson> {
    match value {
        Bson::Array(items) if !items.is_empty() => items.iter().collect(),
        other => vec![other],
    }
}
