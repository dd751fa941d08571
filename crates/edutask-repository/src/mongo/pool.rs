//! MongoDB client and connection pool management.

use crate::mongo::MongoCollectionStore;
use crate::schema::SchemaDescriptor;
use crate::traits::{DocumentDatabase, DocumentStore};
use async_trait::async_trait;
use bson::{doc, Document};
use edutask_config::DatabaseConfig;
use edutask_core::{EdutaskError, EdutaskResult, HealthCheck, HealthStatus};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handle to one MongoDB database.
///
/// The driver's [`Client`] owns the connection pool; cloning a connection
/// shares that pool.
#[derive(Clone)]
pub struct MongoConnection {
    client: Client,
    database: Database,
}

impl MongoConnection {
    /// Builds a client from configuration.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first operation (or [`health_check`](Self::health_check)), bounded by
    /// the server selection timeout.
    pub async fn connect(config: &DatabaseConfig) -> EdutaskResult<Self> {
        info!("Connecting to MongoDB database '{}'...", config.name);

        let mut options = ClientOptions::parse(&config.url).await.map_err(|e| {
            warn!("Failed to parse MongoDB URL: {}", e);
            EdutaskError::Configuration(format!("Invalid MongoDB URL: {}", e))
        })?;
        options.app_name = config.app_name.clone();
        options.connect_timeout = Some(config.connect_timeout());
        options.server_selection_timeout = Some(config.server_selection_timeout());
        if let Some(size) = config.max_pool_size {
            options.max_pool_size = Some(size);
        }

        let client = Client::with_options(options).map_err(|e| {
            warn!("Failed to create MongoDB client: {}", e);
            EdutaskError::Database(format!("Failed to connect: {}", e))
        })?;
        let database = client.database(&config.name);

        info!("MongoDB client ready");
        Ok(Self { client, database })
    }

    /// Pings the server.
    pub async fn health_check(&self) -> EdutaskResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| EdutaskError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Shuts the client down, waiting for in-flight operations.
    pub async fn close(self) {
        info!("Closing MongoDB client...");
        self.client.shutdown().await;
        info!("MongoDB client closed");
    }
}

impl std::fmt::Debug for MongoConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConnection")
            .field("database", &self.database.name())
            .finish()
    }
}

#[async_trait]
impl DocumentDatabase for MongoConnection {
    async fn list_collection_names(&self) -> EdutaskResult<Vec<String>> {
        Ok(self.database.list_collection_names().await?)
    }

    async fn create_collection(&self, name: &str, schema: &SchemaDescriptor) -> EdutaskResult<()> {
        self.database
            .create_collection(name)
            .validator(schema.validator_document()?)
            .await?;

        let collection = self.database.collection::<Document>(name);
        for field in &schema.unique_fields {
            let mut keys = Document::new();
            keys.insert(field.as_str(), 1);
            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build();
            collection.create_index(index).await?;
            debug!("Created unique index on {}.{}", name, field);
        }
        Ok(())
    }

    fn collection(&self, name: &str) -> Arc<dyn DocumentStore> {
        Arc::new(MongoCollectionStore::new(self.database.collection(name)))
    }
}

#[async_trait]
impl HealthCheck for MongoConnection {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn check(&self) -> HealthStatus {
        match MongoConnection::health_check(self).await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!("MongoDB health check failed: {}", e);
                HealthStatus::Unhealthy(e.to_string())
            }
        }
    }
}
