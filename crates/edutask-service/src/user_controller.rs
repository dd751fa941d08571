//! User controller trait definition.

use bson::Document;
use edutask_core::{EdutaskResult, Interface, JsonRecord};
use async_trait::async_trait;

/// User lookups and CRUD over the `user` collection.
#[async_trait]
pub trait UserController: Interface + Send + Sync {
    /// Finds the user registered under `email`.
    ///
    /// `None` is a type error and a value without `@` is rejected with
    /// `Error: invalid email address`, both before the store is queried.
    /// When several users share the address the first is returned and a
    /// warning is logged.
    async fn get_user_by_email(&self, email: Option<&str>) -> EdutaskResult<Option<Document>>;

    /// Creates a user.
    async fn create(&self, data: Document) -> EdutaskResult<JsonRecord>;

    /// Gets a user by identifier.
    async fn get(&self, id: &str) -> EdutaskResult<Option<JsonRecord>>;

    /// Lists all users.
    async fn get_all(&self) -> EdutaskResult<Vec<JsonRecord>>;

    /// Sets the given fields on a user and returns the updated record.
    async fn update(&self, id: &str, data: Document) -> EdutaskResult<Option<JsonRecord>>;

    /// Deletes a user.
    async fn delete(&self, id: &str) -> EdutaskResult<bool>;
}
