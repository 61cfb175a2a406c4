//! Claim Analyzer
//!
//! Sends cleaned claim text to the chat-completion endpoint with a fixed
//! investigator prompt and turns the JSON reply into an [`AnalysisResult`].
//! A reply that is not the requested JSON object degrades to a neutral
//! sentinel result instead of failing the request.

use std::sync::Arc;

use tracing::{error, info};

use crate::llm::LLMAdapter;
use crate::models::AnalysisResult;
use crate::types::{AppError, LLMMessage, LLMRequest, ResponseFormat};

pub const PARSE_ERROR_SUMMARY: &str = "Error parsing analysis results.";
pub const NEUTRAL_SCORE: i64 = 50;
/// How much of an unparsable reply is echoed back in `detailed_analysis`.
pub const RAW_PREVIEW_CHARS: usize = 500;

const SYSTEM_PROMPT: &str = "You are an expert insurance fraud investigator.";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Empty document provided for analysis.")]
    InvalidInput,

    #[error("OpenAI client not initialized. Check your API key.")]
    ClientUnavailable,

    #[error("Error calling OpenAI API: {0}")]
    RemoteCall(String),
}

#[derive(Clone)]
pub struct ClaimAnalyzer {
    client: Option<Arc<dyn LLMAdapter>>,
    model: String,
}

impl ClaimAnalyzer {
    /// `client` is `None` when no credential was available at startup.
    pub fn new(client: Option<Arc<dyn LLMAdapter>>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::InvalidInput);
        }

        let client = self.client.as_ref().ok_or(AnalysisError::ClientUnavailable)?;

        info!(text_len = text.len(), model = %self.model, "Analyzing document");

        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![
                LLMMessage::system(SYSTEM_PROMPT),
                LLMMessage::user(Self::create_prompt(text)),
            ],
            max_tokens: None,
            temperature: Some(0.0),
            response_format: Some(ResponseFormat::JsonObject),
        };

        let response = client.create_chat_completion(&request).await.map_err(|e| {
            error!(error = %e, "Error calling OpenAI API");
            let message = match e {
                AppError::LLMApi(message) => message,
                other => other.to_string(),
            };
            AnalysisError::RemoteCall(message)
        })?;

        info!(
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "Received analysis response"
        );

        Ok(Self::parse_response(&response.content))
    }

    pub fn create_prompt(text: &str) -> String {
        format!(
            r#"You are an expert insurance fraud investigator. Analyze the following insurance claim document for inconsistencies, logical errors, or suspicious elements.

Document:
{text}

Instructions:
1. Carefully check for inconsistencies in dates, people, events, and logical errors.
2. Write a brief critical summary about any suspicious points you find.
3. Provide a trustworthiness score between 1-100 where:
   - 1 = Very suspicious (many inconsistencies)
   - 100 = Fully coherent and believable
4. Justify your score with specific examples from the text.
5. Consider if the claimant has proof of the claim such as pictures, videos, evidence, or documents; this should raise the score.

Format your response as a JSON object with the following structure:
{{
    "summary": "A brief paragraph summarizing your findings",
    "trustworthiness_score": [score between 1-100],
    "detailed_analysis": "A more detailed explanation of inconsistencies found"
}}"#
        )
    }

    /// Never fails: anything that is not the three-field object becomes the sentinel result.
    pub fn parse_response(content: &str) -> AnalysisResult {
        match serde_json::from_str::<AnalysisResult>(content) {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Error parsing OpenAI response");
                Self::fallback_result(content)
            }
        }
    }

    fn fallback_result(content: &str) -> AnalysisResult {
        let preview: String = content.chars().take(RAW_PREVIEW_CHARS).collect();
        AnalysisResult {
            summary: PARSE_ERROR_SUMMARY.to_string(),
            trustworthiness_score: NEUTRAL_SCORE,
            detailed_analysis: format!("Error parsing model response: {}...", preview),
        }
    }
}
