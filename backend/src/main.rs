//! Document filter server entry point.

use anyhow::Context;
use backend::{
    api::{document_filter::DocumentFilter, taggable_content::TaggableContent},
    config::FilterConfig,
    db_utils::{
        edition_store::ClickhouseEditionStore, search_gateway::HttpSearchGateway,
        taggable_source::ClickhouseTaggableSource,
    },
    server_extra::document_filter::{AppState, router},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = FilterConfig::from_env()?;
    tracing::info!("Search service at {}", config.search_endpoint);

    let state = AppState {
        filter: DocumentFilter::new(
            &config,
            HttpSearchGateway::from_config(&config)?,
            ClickhouseEditionStore::new(&config.clickhouse),
        ),
        taggable: TaggableContent::new(ClickhouseTaggableSource::new(&config.clickhouse)),
        default_per_page: config.default_per_page,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    tracing::info!("Listening on {}", config.bind_address);
    axum::serve(listener, router(state)).await.context("Server error")?;
    Ok(())
}
