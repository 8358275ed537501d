//! Database connection module for `ClickHouse`.
//!
//! This module provides connection configuration for the `ClickHouse`
//! database holding the raw metric event rows. It supports creating client
//! instances from environment variables and provides a convenient way to
//! manage database connections throughout the application.

use anyhow::{Context, Result};
use clickhouse::Client;
use std::sync::Arc;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `ClickHouse` database URL (e.g., <http://localhost:8123>)
    pub url: String,
    /// Database name to use
    pub database: String,
    /// Username for authentication
    pub user: String,
    /// Password for authentication
    pub password: String,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ADSIGHT_DB_URL`: Database URL (default: <http://localhost:8123>)
    /// - `ADSIGHT_DB_NAME`: Database name (default: "adsight")
    /// - `ADSIGHT_DB_USER`: Database user (default: "adsight")
    /// - `ADSIGHT_DB_PASSWORD`: Database password (default: "`adsight_dev`")
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables cannot be read.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: std::env::var("ADSIGHT_DB_URL")
                .unwrap_or_else(|_| "http://localhost:8123".to_string()),
            database: std::env::var("ADSIGHT_DB_NAME").unwrap_or_else(|_| "adsight".to_string()),
            user: std::env::var("ADSIGHT_DB_USER").unwrap_or_else(|_| "adsight".to_string()),
            password: std::env::var("ADSIGHT_DB_PASSWORD")
                .unwrap_or_else(|_| "adsight_dev".to_string()),
        })
    }
}

/// Database client wrapper.
#[derive(Clone)]
pub struct Database {
    client: Arc<Client>,
}

impl Database {
    /// Create a new database client from configuration.
    #[must_use]
    pub fn new(config: &DatabaseConfig) -> Self {
        let client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database)
            .with_user(&config.user)
            .with_password(&config.password);

        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying `ClickHouse` client.
    #[must_use]
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }

    /// Test database connectivity by executing a simple query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or the query fails.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .query("SELECT 1")
            .fetch_one::<u8>()
            .await
            .context("Failed to ping database")?;
        Ok(())
    }
}
