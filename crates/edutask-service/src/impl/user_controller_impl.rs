//! User controller implementation.

use crate::controller::Controller;
use crate::user_controller::UserController;
use async_trait::async_trait;
use bson::{doc, Document};
use edutask_core::{rules, EdutaskError, EdutaskResult, JsonRecord, INVALID_EMAIL_MESSAGE};
use edutask_repository::Dao;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shaku-injectable user controller.
#[derive(Component)]
#[shaku(interface = UserController)]
pub struct UserControllerComponent {
    #[shaku(inject)]
    dao: Arc<dyn Dao>,
}

impl UserControllerComponent {
    /// Creates a controller over the given user DAO.
    #[must_use]
    pub fn new(dao: Arc<dyn Dao>) -> Self {
        Self { dao }
    }

    fn controller(&self) -> Controller {
        Controller::new(Arc::clone(&self.dao))
    }
}

#[async_trait]
impl UserController for UserControllerComponent {
    async fn get_user_by_email(&self, email: Option<&str>) -> EdutaskResult<Option<Document>> {
        let email = email.ok_or_else(|| EdutaskError::InvalidType("email must be a string".to_string()))?;
        if !rules::is_email_shaped(email) {
            return Err(EdutaskError::invalid_input(INVALID_EMAIL_MESSAGE));
        }

        debug!("Getting user by email: {}", email);
        let mut users = self.dao.find(doc! { "email": email }).await?;

        if users.len() > 1 {
            warn!("Error: more than one user found with mail {}", email);
        }
        Ok(if users.is_empty() {
            None
        } else {
            Some(users.swap_remove(0))
        })
    }

    async fn create(&self, data: Document) -> EdutaskResult<JsonRecord> {
        self.controller().create(data).await
    }

    async fn get(&self, id: &str) -> EdutaskResult<Option<JsonRecord>> {
        self.controller().get(id).await
    }

    async fn get_all(&self) -> EdutaskResult<Vec<JsonRecord>> {
        self.controller().get_all().await
    }

    async fn update(&self, id: &str, data: Document) -> EdutaskResult<Option<JsonRecord>> {
        self.controller().update(id, data).await
    }

    async fn delete(&self, id: &str) -> EdutaskResult<bool> {
        self.controller().delete(id).await
    }
}

impl std::fmt::Debug for UserControllerComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserControllerComponent").finish_non_exhaustive()
    }
}
