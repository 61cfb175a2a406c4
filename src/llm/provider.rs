use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::LLMConfig;
use crate::llm::openai::OpenAIAdapter;
use crate::types::{AppResult, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Builds the chat-completion client once at startup.
///
/// Returns `None` (after logging) when no credential is configured or the HTTP
/// client cannot be constructed. The process keeps running and analysis
/// requests report the client as unavailable.
pub fn build_adapter(config: &LLMConfig) -> Option<Arc<dyn LLMAdapter>> {
    let Some(api_key) = config.api_key() else {
        error!("OpenAI API key not found. Please set OPENAI_API_KEY in your environment or .env file.");
        return None;
    };

    match OpenAIAdapter::with_base_url(api_key, &config.base_url) {
        Ok(adapter) => {
            info!(base_url = %config.base_url, model = %config.model, "LLM client initialized");
            Some(Arc::new(adapter))
        }
        Err(e) => {
            error!(error = %e, "Error initializing LLM client");
            None
        }
    }
}
