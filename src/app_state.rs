use std::sync::Arc;

use crate::{
    access_engine::AccessEngine,
    audit_store::AuditStore,
    audit_store_sled::SledAuditStore,
    catalog_store::CatalogStore,
    catalog_store_sled::SledCatalogStore,
    config::{GateConfig, StoreBackend},
    errors::{GateError, GateResult},
    identity::{IdentityLookup, SledUserDirectory},
    memory_store::{MemoryAuditStore, MemoryCatalogStore, MemoryUserDirectory},
};

/// Shared handles for the HTTP handlers and the CLI.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub audit: Arc<dyn AuditStore>,
    pub engine: AccessEngine,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        audit: Arc<dyn AuditStore>,
        identity: Arc<dyn IdentityLookup>,
    ) -> Self {
        let engine = AccessEngine::new(catalog.clone(), audit.clone(), identity);
        Self {
            catalog,
            audit,
            engine,
        }
    }

    /// Opens the stores selected by `config.backend`.
    pub fn from_config(config: &GateConfig) -> GateResult<Self> {
        match config.backend {
            StoreBackend::Sled => {
                let db = sled::open(&config.data_dir).map_err(|e| {
                    GateError::store(format!("open sled db at {}", config.data_dir), e)
                })?;
                tracing::info!(data_dir = %config.data_dir, "opened sled stores");
                Ok(Self::new(
                    Arc::new(SledCatalogStore::with_db(&db)?),
                    Arc::new(SledAuditStore::with_db(&db)?),
                    Arc::new(SledUserDirectory::open(&db)?),
                ))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory stores; nothing will be persisted");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCatalogStore::new()),
            Arc::new(MemoryAuditStore::new()),
            Arc::new(MemoryUserDirectory::new()),
        )
    }
}
