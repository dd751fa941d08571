//! Store trait definitions.

use crate::schema::{SchemaDescriptor, ValidatorProvider};
use async_trait::async_trait;
use bson::Document;
use edutask_core::{EdutaskResult, Interface, RecordId};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a single-document update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matched by the identifier (0 or 1).
    pub matched: u64,
    /// Documents actually changed (0 or 1).
    pub modified: u64,
}

impl UpdateOutcome {
    /// True when the identifier selected a document.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.matched > 0
    }
}

/// One named collection of documents.
///
/// Implementations enforce the collection's schema and unique fields on
/// every write and report violations as [`edutask_core::EdutaskError`]
/// variants carrying the store's message.
#[async_trait]
pub trait DocumentStore: Interface + Send + Sync {
    /// Returns the collection name.
    fn name(&self) -> &str;

    /// Inserts a document and returns its identifier.
    ///
    /// A fresh identifier is assigned when the document has no `_id`.
    async fn insert_one(&self, document: Document) -> EdutaskResult<RecordId>;

    /// Fetches a document by identifier.
    async fn find_by_id(&self, id: RecordId) -> EdutaskResult<Option<Document>>;

    /// Returns every document matching `filter`, in insertion order.
    async fn find(&self, filter: Document) -> EdutaskResult<Vec<Document>>;

    /// Applies an operator update (`$set`, `$unset`, ...) to one document.
    async fn update_one(&self, id: RecordId, update: Document) -> EdutaskResult<UpdateOutcome>;

    /// Deletes one document and returns the number removed.
    async fn delete_one(&self, id: RecordId) -> EdutaskResult<u64>;

    /// Removes the collection with all its documents.
    async fn drop_collection(&self) -> EdutaskResult<()>;
}

/// A database holding named collections.
#[async_trait]
pub trait DocumentDatabase: Send + Sync {
    /// Lists the collections that currently exist.
    async fn list_collection_names(&self) -> EdutaskResult<Vec<String>>;

    /// Creates a collection with a validator and unique indexes.
    async fn create_collection(&self, name: &str, schema: &SchemaDescriptor) -> EdutaskResult<()>;

    /// Returns a handle to a collection, whether or not it exists yet.
    fn collection(&self, name: &str) -> Arc<dyn DocumentStore>;

    /// Returns a handle to a collection, creating it first when missing.
    ///
    /// An existing collection keeps whatever validator it already has.
    async fn open_collection(
        &self,
        name: &str,
        validators: &dyn ValidatorProvider,
    ) -> EdutaskResult<Arc<dyn DocumentStore>> {
        let existing = self.list_collection_names().await?;
        if existing.iter().any(|n| n == name) {
            debug!("Collection '{}' already exists", name);
        } else {
            let schema = validators.validator(name)?;
            self.create_collection(name, &schema).await?;
            info!("Created collection '{}' with validator", name);
        }
        Ok(self.collection(name))
    }
}
