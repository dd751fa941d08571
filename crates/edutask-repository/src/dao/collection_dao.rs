//! Dao trait: record gateway for a single collection.
//!
//! Identifiers come in as the bare 24-hex string and go out in transport
//! form (`{"$oid": ...}`). Only [`Dao::find`] hands back native documents.

use crate::traits::UpdateOutcome;
use async_trait::async_trait;
use bson::Document;
use edutask_core::{EdutaskResult, Interface, JsonRecord};

/// Data access object bound to one collection.
#[async_trait]
pub trait Dao: Interface + Send + Sync {
    /// Returns the name of the bound collection.
    fn collection_name(&self) -> &str;

    /// Inserts `data` and returns the stored record in transport form.
    ///
    /// Schema and unique-index violations surface as
    /// [`Validation`](edutask_core::EdutaskError::Validation) and
    /// [`DuplicateKey`](edutask_core::EdutaskError::DuplicateKey).
    async fn create(&self, data: Document) -> EdutaskResult<JsonRecord>;

    /// Returns every document matching `filter`, unconverted.
    async fn find(&self, filter: Document) -> EdutaskResult<Vec<Document>>;

    /// Returns the record with identifier `id`, in transport form.
    async fn find_one(&self, id: &str) -> EdutaskResult<Option<JsonRecord>>;

    /// Applies an operator update to the record with identifier `id`.
    ///
    /// A missing record is not an error; check [`UpdateOutcome::found`].
    async fn update(&self, id: &str, change: Document) -> EdutaskResult<UpdateOutcome>;

    /// Deletes the record with identifier `id`. Returns `true` if removed.
    async fn delete(&self, id: &str) -> EdutaskResult<bool>;

    /// Drops the whole collection.
    async fn drop(&self) -> EdutaskResult<()>;
}
