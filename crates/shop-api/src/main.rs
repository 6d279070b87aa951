//! Catalog search REST API server: /product/search.

use shop_api::config::ServiceConfig;
use shop_api::server::{self, AppState};
use shop_retrieval::HttpRetriever;
use shop_search::CatalogSearch;
use shop_store::InMemoryCatalog;
use shop_types::ProductSearch;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    let (catalog, _report) = InMemoryCatalog::load(&config.reviews_path, &config.meta_path).await?;

    tracing::info!(url = %config.retrieval_url, "using retrieval engine");
    let retriever = HttpRetriever::new(
        config.retrieval_url.clone(),
        config.retrieval_api_key.clone(),
    );
    let search: Arc<dyn ProductSearch + Send + Sync> = Arc::new(
        CatalogSearch::new(retriever, catalog).with_rerank_config(config.rerank_config()),
    );

    let app = server::router(Arc::new(AppState { search }));
    tracing::info!("catalog search API listening on {}", config.listen);
    axum::serve(
        tokio::net::TcpListener::bind(config.listen).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
