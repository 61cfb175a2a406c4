use std::sync::Arc;

use claim_lens::agents::{ClaimAnalyzer, ClaimPipeline};
use claim_lens::storage::Storage;
use claim_lens::{config::Config, create_router, llm, utils::init_logger, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    let storage = Storage::new(&config.storage);
    storage
        .ensure_dirs()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create storage directories: {}", e))?;

    // A missing credential is logged here and reported per request later
    let client = llm::build_adapter(&config.llm);
    let analyzer = ClaimAnalyzer::new(client, config.llm.model.clone());

    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(ClaimPipeline::new(analyzer, storage)),
    };

    let app = create_router(state);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
