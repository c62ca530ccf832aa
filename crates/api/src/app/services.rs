use std::sync::Arc;

use anyhow::Context;

use superheroes_infra::{InMemorySuperheroStore, SqliteSuperheroStore, SuperheroStore};

use crate::config::{AppConfig, StoreBackend};

/// Shared handle passed to every handler through an `Extension`.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn SuperheroStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn SuperheroStore>) -> Self {
        Self { store }
    }

    /// Services over an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySuperheroStore::new()))
    }

    pub fn store(&self) -> &dyn SuperheroStore {
        self.store.as_ref()
    }
}

/// Open the store selected by `config`.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match config.store_backend() {
        StoreBackend::InMemory => {
            tracing::warn!("using in-memory store; data is lost when the process exits");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Sqlite(url) => {
            let store = SqliteSuperheroStore::connect(&url)
                .await
                .with_context(|| format!("failed to open database {url}"))?;
            tracing::info!(database_url = %url, "sqlite store ready");
            Ok(AppServices::new(Arc::new(store)))
        }
    }
}
