use anyhow::Context;
use sticky_note::{
    AppState, DashboardConfig, FileMarketData, HttpServer, JsonFileReviewStore,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => DashboardConfig::from_yaml_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => DashboardConfig::default(),
    }
    .with_env();

    info!("Sticky Note v{}", sticky_note::version());
    info!(
        "Data directory {:?}, reviews in {:?}",
        config.data_dir, config.review_file
    );

    let reviews = Arc::new(JsonFileReviewStore::new(&config.review_file));
    let market = Arc::new(FileMarketData::new(&config.data_dir));
    let state = Arc::new(AppState::new(config, reviews, market));

    info!("Loaded {} companies", state.companies.len());

    HttpServer::new(state)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))
}
