//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use anyhow::Context;

/// Connection string used when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://superheroes.db?mode=rwc";

/// Listen address used when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5555";

/// `DATABASE_URL` value that selects the in-memory store.
pub const IN_MEMORY_DATABASE_URL: &str = "memory";

/// Which store implementation to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Non-durable tables in process memory (dev/tests).
    InMemory,
    /// SQLite database at the given `sqlx` URL.
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            tracing::warn!("DATABASE_URL not set; using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| {
            tracing::warn!("BIND_ADDR not set; using {DEFAULT_BIND_ADDR}");
            DEFAULT_BIND_ADDR.to_string()
        });
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_addr:?}"))?;

        Ok(Self {
            bind_addr,
            database_url,
        })
    }

    pub fn store_backend(&self) -> StoreBackend {
        if self.database_url.trim() == IN_MEMORY_DATABASE_URL {
            StoreBackend::InMemory
        } else {
            StoreBackend::Sqlite(self.database_url.clone())
        }
    }
}
