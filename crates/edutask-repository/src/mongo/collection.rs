//! [`DocumentStore`] backed by a MongoDB collection.

use crate::traits::{DocumentStore, UpdateOutcome};
use async_trait::async_trait;
use bson::{doc, Bson, Document};
use edutask_core::{EdutaskError, EdutaskResult, RecordId};
use futures::TryStreamExt;
use mongodb::Collection;
use tracing::debug;

/// A MongoDB collection of untyped documents.
#[derive(Debug, Clone)]
pub struct MongoCollectionStore {
    collection: Collection<Document>,
}

impl MongoCollectionStore {
    #[must_use]
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl DocumentStore for MongoCollectionStore {
    fn name(&self) -> &str {
        self.collection.name()
    }

    async fn insert_one(&self, document: Document) -> EdutaskResult<RecordId> {
        let result = self.collection.insert_one(document).await?;
        match result.inserted_id {
            Bson::ObjectId(oid) => {
                debug!(collection = %self.collection.name(), id = %oid, "inserted document");
                Ok(RecordId(oid))
            }
            other => Err(EdutaskError::internal(format!(
                "store assigned a non-ObjectId identifier: {other}"
            ))),
        }
    }

    async fn find_by_id(&self, id: RecordId) -> EdutaskResult<Option<Document>> {
        Ok(self.collection.find_one(id.filter()).await?)
    }

    async fn find(&self, filter: Document) -> EdutaskResult<Vec<Document>> {
        let cursor = self.collection.find(filter).sort(doc! { "_id": 1 }).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn update_one(&self, id: RecordId, update: Document) -> EdutaskResult<UpdateOutcome> {
        let result = self.collection.update_one(id.filter(), update).await?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, id: RecordId) -> EdutaskResult<u64> {
        let result = self.collection.delete_one(id.filter()).await?;
        Ok(result.deleted_count)
    }

    async fn drop_collection(&self) -> EdutaskResult<()> {
        self.collection.drop().await?;
        debug!(collection = %self.collection.name(), "dropped collection");
        Ok(())
    }
}
