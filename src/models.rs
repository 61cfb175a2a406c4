use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::agents::ClaimPipeline;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<ClaimPipeline>,
}

/// Outcome of a claim analysis. The score is whatever the model produced;
/// the 1-100 range is requested in the prompt but not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(deserialize_with = "lenient_score")]
    pub trustworthiness_score: i64,
    pub detailed_analysis: String,
}

/// Models occasionally send `"72"` or `72.0` instead of `72`.
fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 => Ok(f as i64),
                    _ => Err(D::Error::custom(format!("score is not an integer: {}", n))),
                }
            }
        }
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("score is not an integer: {:?}", s))),
        other => Err(D::Error::custom(format!("score is not a number: {}", other))),
    }
}

// API Request/Response types

/// Error body returned by every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub llm: String,
}
