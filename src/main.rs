use std::sync::Arc;

use anime_match_api::{
    api::{create_router, AppState},
    cache::Cache,
    config::Config,
    services::providers::JikanProvider,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anime_match_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let (cache, cache_writer) = Cache::connect(
        config.redis_url.as_deref(),
        config.search_cache_ttl(),
        config.search_cache_capacity,
    )
    .await?;
    let catalog = JikanProvider::new(
        cache,
        config.jikan_api_url.clone(),
        config.search_cache_ttl_secs,
        config.request_interval(),
    );

    let state = AppState::new(Arc::new(catalog), config.seed_plan(), config.ranking());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
