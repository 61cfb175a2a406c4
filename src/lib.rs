// Claim Lens - LLM-assisted trustworthiness checks for insurance claim documents

pub mod agents;
pub mod config;
pub mod documents;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::{AnalysisResult, AppState};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
