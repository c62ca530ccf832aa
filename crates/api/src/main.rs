use anyhow::Context;

use superheroes_api::app;
use superheroes_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    superheroes_observability::init();

    let config = AppConfig::from_env()?;
    let services = app::build_services(&config).await?;
    let router = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
