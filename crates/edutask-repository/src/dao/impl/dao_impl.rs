//! `DaoImpl`: the [`Dao`] over any [`DocumentStore`].
//!
//! ```text
//! Controller
//!   ↓ Arc<dyn Dao>
//! DaoImpl                 ← id parsing, re-read after insert, transport form
//!   ↓ Arc<dyn DocumentStore>
//! MongoCollectionStore / InMemoryStore
//! ```

use crate::dao::Dao;
use crate::schema::ValidatorProvider;
use crate::traits::{DocumentDatabase, DocumentStore, UpdateOutcome};
use async_trait::async_trait;
use bson::Document;
use edutask_core::{to_json_record, EdutaskError, EdutaskResult, JsonRecord, RecordId};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Record gateway bound to one collection.
#[derive(Component)]
#[shaku(interface = Dao)]
pub struct DaoImpl {
    store: Arc<dyn DocumentStore>,
}

impl DaoImpl {
    /// Wraps an already opened collection.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Opens collection `name`, creating it with its validator if it does
    /// not exist yet.
    pub async fn open(
        database: &dyn DocumentDatabase,
        validators: &dyn ValidatorProvider,
        name: &str,
    ) -> EdutaskResult<Self> {
        let store = database.open_collection(name, validators).await?;
        Ok(Self::new(store))
    }

    /// Returns the store handle.
    #[must_use]
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }
}

impl std::fmt::Debug for DaoImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaoImpl")
            .field("collection", &self.store.name())
            .finish()
    }
}

#[async_trait]
impl Dao for DaoImpl {
    fn collection_name(&self) -> &str {
        self.store.name()
    }

    async fn create(&self, data: Document) -> EdutaskResult<JsonRecord> {
        debug!("DAO: create in {}", self.store.name());
        let id = self.store.insert_one(data).await?;
        let stored = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| EdutaskError::not_found("Record", id))?;
        to_json_record(stored)
    }

    async fn find(&self, filter: Document) -> EdutaskResult<Vec<Document>> {
        debug!("DAO: find in {} with {}", self.store.name(), filter);
        self.store.find(filter).await
    }

    async fn find_one(&self, id: &str) -> EdutaskResult<Option<JsonRecord>> {
        debug!("DAO: find_one {} in {}", id, self.store.name());
        let id = RecordId::parse(id)?;
        self.store
            .find_by_id(id)
            .await?
            .map(to_json_record)
            .transpose()
    }

    async fn update(&self, id: &str, change: Document) -> EdutaskResult<UpdateOutcome> {
        debug!("DAO: update {} in {}", id, self.store.name());
        let id = RecordId::parse(id)?;
        self.store.update_one(id, change).await
    }

    async fn delete(&self, id: &str) -> EdutaskResult<bool> {
        debug!("DAO: delete {} in {}", id, self.store.name());
        let id = RecordId::parse(id)?;
        Ok(self.store.delete_one(id).await? > 0)
    }

    async fn drop(&self) -> EdutaskResult<()> {
        self.store.drop_collection().await?;
        info!("Dropped collection '{}'", self.store.name());
        Ok(())
    }
}
