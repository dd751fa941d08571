//! Common test infrastructure for MongoDB integration tests.

use edutask_config::DatabaseConfig;
use edutask_repository::MongoConnection;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mongo::Mongo;

/// Test database container wrapper.
///
/// Manages a MongoDB testcontainer lifecycle and provides a connection.
pub struct TestDatabase {
    _container: ContainerAsync<Mongo>,
    connection: MongoConnection,
}

impl TestDatabase {
    /// Starts a fresh MongoDB container and waits until it answers a ping.
    pub async fn new() -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let config = DatabaseConfig {
            url: format!("mongodb://127.0.0.1:{}", port),
            name: "edutask_test".to_string(),
            ..DatabaseConfig::default()
        };

        let connection = Self::connect_with_retry(&config, 30).await;

        Self {
            _container: container,
            connection,
        }
    }

    /// Returns a handle to the test database.
    pub fn connection(&self) -> MongoConnection {
        self.connection.clone()
    }

    async fn connect_with_retry(config: &DatabaseConfig, max_attempts: u32) -> MongoConnection {
        let connection = MongoConnection::connect(config)
            .await
            .expect("Failed to build MongoDB client");

        let mut attempts = 0;
        loop {
            attempts += 1;
            match connection.health_check().await {
                Ok(()) => return connection,
                Err(e) => {
                    if attempts >= max_attempts {
                        panic!("MongoDB not reachable after {} attempts: {}", max_attempts, e);
                    }
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}
