//! Drop all rows and load the demo heroes and powers into `DATABASE_URL`.

use anyhow::{bail, Context};

use superheroes_api::config::{AppConfig, StoreBackend};
use superheroes_infra::{seed, SqliteSuperheroStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    superheroes_observability::init();

    let config = AppConfig::from_env()?;
    let url = match config.store_backend() {
        StoreBackend::Sqlite(url) => url,
        StoreBackend::InMemory => {
            bail!("DATABASE_URL=memory cannot be seeded; point it at a sqlite database")
        }
    };

    let store = SqliteSuperheroStore::connect(&url)
        .await
        .with_context(|| format!("failed to open database {url}"))?;

    let summary = seed::seed(&store)
        .await
        .context("failed to seed database")?;

    tracing::info!(
        heroes = summary.heroes.len(),
        powers = summary.powers.len(),
        database_url = %url,
        "database seeded successfully"
    );
    Ok(())
}
