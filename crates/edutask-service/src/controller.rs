//! Generic CRUD controller over a [`Dao`].

use bson::{doc, Document};
use edutask_core::{to_json_record, EdutaskResult, JsonRecord};
use edutask_repository::Dao;
use std::sync::Arc;
use tracing::debug;

/// Plain pass-through to a DAO that hands every record back in transport
/// form.
#[derive(Clone)]
pub struct Controller {
    dao: Arc<dyn Dao>,
}

impl Controller {
    #[must_use]
    pub fn new(dao: Arc<dyn Dao>) -> Self {
        Self { dao }
    }

    /// Creates a record.
    pub async fn create(&self, data: Document) -> EdutaskResult<JsonRecord> {
        self.dao.create(data).await
    }

    /// Returns one record by identifier.
    pub async fn get(&self, id: &str) -> EdutaskResult<Option<JsonRecord>> {
        self.dao.find_one(id).await
    }

    /// Returns every record of the collection.
    pub async fn get_all(&self) -> EdutaskResult<Vec<JsonRecord>> {
        self.dao
            .find(Document::new())
            .await?
            .into_iter()
            .map(to_json_record)
            .collect()
    }

    /// Sets the given fields and returns the updated record.
    ///
    /// Returns `None` when no record has identifier `id`.
    pub async fn update(&self, id: &str, data: Document) -> EdutaskResult<Option<JsonRecord>> {
        debug!("Controller: update {}", id);
        self.dao.update(id, doc! { "$set": data }).await?;
        self.dao.find_one(id).await
    }

    /// Deletes a record. Returns `true` if one was removed.
    pub async fn delete(&self, id: &str) -> EdutaskResult<bool> {
        self.dao.delete(id).await
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edutask_core::{record_id_of, EdutaskError};
    use edutask_repository::{
        BsonType, DaoImpl, InMemoryDatabase, JsonSchema, SchemaDescriptor, StaticValidatorProvider,
    };
    use serde_json::json;

    async fn todo_controller() -> Controller {
        let validators = StaticValidatorProvider::new().with_schema(
            "todo",
            SchemaDescriptor::new(
                JsonSchema::object()
                    .required_property("description", JsonSchema::of_type(BsonType::String))
                    .optional_property("done", JsonSchema::of_type(BsonType::Bool)),
            ),
        );
        let db = InMemoryDatabase::new();
        let dao = DaoImpl::open(&db, &validators, "todo").await.unwrap();
        Controller::new(Arc::new(dao))
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let controller = todo_controller().await;

        let created = controller
            .create(doc! { "description": "Watch video", "done": false })
            .await
            .unwrap();
        let id = record_id_of(&created).unwrap().to_hex();

        assert_eq!(controller.get(&id).await.unwrap(), Some(created.clone()));

        let updated = controller
            .update(&id, doc! { "done": true })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["done"], json!(true));
        assert_eq!(updated["description"], json!("Watch video"));
        assert_eq!(updated["_id"], created["_id"]);

        assert!(controller.delete(&id).await.unwrap());
        assert!(controller.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_uses_transport_ids() {
        let controller = todo_controller().await;
        controller.create(doc! { "description": "one" }).await.unwrap();
        controller.create(doc! { "description": "two" }).await.unwrap();

        let all = controller.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r["_id"]["$oid"].is_string()));
        assert_eq!(all[0]["description"], json!("one"));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let controller = todo_controller().await;
        let missing = edutask_core::RecordId::new().to_hex();
        assert!(controller
            .update(&missing, doc! { "done": true })
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let controller = todo_controller().await;
        assert!(matches!(
            controller.create(doc! { "done": true }).await.unwrap_err(),
            EdutaskError::Validation(_)
        ));
        assert!(matches!(
            controller.get("nope").await.unwrap_err(),
            EdutaskError::InvalidId { .. }
        ));
    }
}
