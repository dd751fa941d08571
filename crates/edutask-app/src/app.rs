//! Operator commands over a document database.

use crate::di::{build_edutask_module, ControllerResolver};
use bson::{Bson, Document};
use edutask_config::AppConfig;
use edutask_core::{to_json_record, EdutaskError, EdutaskResult, JsonRecord};
use edutask_repository::{
    Dao, DaoImpl, DocumentDatabase, JsonFileValidatorProvider, MongoConnection, ValidatorProvider,
};
use std::sync::Arc;
use tracing::info;

/// Database plus schema source, shared by every command.
pub struct App {
    database: Arc<dyn DocumentDatabase>,
    validators: Arc<dyn ValidatorProvider>,
}

impl App {
    /// Creates an application over explicit collaborators.
    #[must_use]
    pub fn new(database: Arc<dyn DocumentDatabase>, validators: Arc<dyn ValidatorProvider>) -> Self {
        Self {
            database,
            validators,
        }
    }

    /// Connects to MongoDB and reads schemas from the configured directory.
    pub async fn connect(config: &AppConfig) -> EdutaskResult<(Self, MongoConnection)> {
        let connection = MongoConnection::connect(&config.database).await?;
        let validators = JsonFileValidatorProvider::new(config.validators.directory.clone());
        info!(
            "Reading collection validators from {}",
            validators.directory().display()
        );
        let app = Self::new(Arc::new(connection.clone()), Arc::new(validators));
        Ok((app, connection))
    }

    /// Looks a user up by email through the user controller.
    pub async fn find_user(&self, email: &str) -> EdutaskResult<Option<JsonRecord>> {
        let module = build_edutask_module(self.database.as_ref(), self.validators.as_ref()).await?;
        module
            .user_controller()
            .get_user_by_email(Some(email))
            .await?
            .map(to_json_record)
            .transpose()
    }

    /// Returns the documents of `collection` matching a JSON filter.
    ///
    /// The filter is extended JSON, so `{"_id": {"$oid": "..."}}` selects by
    /// identifier. No filter matches everything.
    pub async fn find(&self, collection: &str, filter: Option<&str>) -> EdutaskResult<Vec<JsonRecord>> {
        let filter = filter.map(parse_filter).transpose()?.unwrap_or_default();
        let dao = DaoImpl::new(self.database.collection(collection));
        dao.find(filter)
            .await?
            .into_iter()
            .map(to_json_record)
            .collect()
    }

    /// Drops `collection`.
    pub async fn drop_collection(&self, collection: &str) -> EdutaskResult<()> {
        DaoImpl::new(self.database.collection(collection)).drop().await
    }
}

/// Parses an extended JSON object into a filter document.
pub fn parse_filter(json: &str) -> EdutaskResult<Document> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| EdutaskError::invalid_input(format!("Filter is not valid JSON: {e}")))?;
    match Bson::try_from(value) {
        Ok(Bson::Document(filter)) => Ok(filter),
        Ok(other) => Err(EdutaskError::invalid_input(format!(
            "Filter must be a JSON object, got {other}"
        ))),
        Err(e) => Err(EdutaskError::invalid_input(format!("Invalid filter: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::USER_COLLECTION;
    use bson::doc;
    use edutask_repository::{
        BsonType, InMemoryDatabase, JsonSchema, SchemaDescriptor, StaticValidatorProvider,
    };
    use serde_json::json;

    fn app_with(db: Arc<InMemoryDatabase>) -> App {
        let validators = StaticValidatorProvider::new().with_schema(
            USER_COLLECTION,
            SchemaDescriptor::new(
                JsonSchema::object().required_property("email", JsonSchema::of_type(BsonType::String)),
            ),
        );
        App::new(db, Arc::new(validators))
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter(r#"{"type": "test"}"#).unwrap(), doc! { "type": "test" });

        let by_id = parse_filter(r#"{"_id": {"$oid": "507f1f77bcf86cd799439011"}}"#).unwrap();
        assert!(by_id.get_object_id("_id").is_ok());

        assert!(parse_filter("[1, 2]").unwrap_err().is_caller_error());
        assert!(parse_filter("{nope").unwrap_err().is_caller_error());
    }

    #[tokio::test]
    async fn test_find_user() {
        let db = Arc::new(InMemoryDatabase::new());
        let app = app_with(Arc::clone(&db));

        assert!(app.find_user("jane@example.com").await.unwrap().is_none());

        db.collection(USER_COLLECTION)
            .insert_one(doc! { "email": "jane@example.com", "firstName": "Jane" })
            .await
            .unwrap();

        let user = app.find_user("jane@example.com").await.unwrap().unwrap();
        assert_eq!(user["firstName"], json!("Jane"));
        assert!(user["_id"]["$oid"].is_string());

        assert!(app.find_user("invalid-email").await.unwrap_err().is_caller_error());
    }

    #[tokio::test]
    async fn test_find_and_drop() {
        let db = Arc::new(InMemoryDatabase::new());
        let app = app_with(Arc::clone(&db));
        let items = db.collection("items");
        items.insert_one(doc! { "name": "a", "type": "test" }).await.unwrap();
        items.insert_one(doc! { "name": "b", "type": "other" }).await.unwrap();

        assert_eq!(app.find("items", None).await.unwrap().len(), 2);
        let matched = app.find("items", Some(r#"{"type": "test"}"#)).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["name"], json!("a"));

        app.drop_collection("items").await.unwrap();
        assert!(app.find("items", None).await.unwrap().is_empty());
        assert!(db.list_collection_names().await.unwrap().is_empty());
    }
}
