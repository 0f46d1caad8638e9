//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and how it is assembled from config.

use crate::adapters::{Argon2Verifier, SqlKeyValueStore};
use crate::config::{Config, CredentialScheme, StorageBackend};
use crate::error::ApiError;
use course_catalog_core::ports::{CredentialVerifier, KeyValueStore};
use course_catalog_core::{CatalogService, MemoryStore, PlaintextVerifier};
use std::sync::Arc;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(catalog: CatalogService, config: Arc<Config>) -> Self {
        Self { catalog, config }
    }

    /// Opens the configured storage backend (running migrations for SQLite)
    /// and wires the workflow service on top of it.
    pub async fn from_config(config: Arc<Config>) -> Result<Self, ApiError> {
        let store: Arc<dyn KeyValueStore> = match config.storage_backend {
            StorageBackend::Sqlite => {
                info!("Connecting to database...");
                let store = SqlKeyValueStore::connect(&config.database_url).await?;
                info!("Running database migrations...");
                store.run_migrations().await?;
                info!("Database migrations complete.");
                Arc::new(store)
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage; data will not survive a restart");
                Arc::new(MemoryStore::new())
            }
        };

        let verifier: Arc<dyn CredentialVerifier> = match config.credential_scheme {
            CredentialScheme::Plaintext => Arc::new(PlaintextVerifier),
            CredentialScheme::Argon2 => Arc::new(Argon2Verifier::new()),
        };

        Ok(Self::new(CatalogService::with_store(store, verifier), config))
    }
}
