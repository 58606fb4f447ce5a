use serde::{Deserialize, Serialize};

use crate::models::{ChatResult, Intent};

/// Maximum accepted question length, in characters.
pub const MAX_QUESTION_CHARS: usize = 500;

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ChatRequest {
    #[schema(example = "Acceptez-vous les animaux ?")]
    pub question: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    pub intent: Option<Intent>,
    /// `null` when the answer has no source.
    pub sources: Option<Vec<String>>,
    pub requires_action: bool,
}

impl From<ChatResult> for ChatResponse {
    fn from(result: ChatResult) -> Self {
        Self {
            answer: result.answer,
            intent: Some(result.intent),
            sources: (!result.sources.is_empty()).then_some(result.sources),
            requires_action: result.requires_action,
        }
    }
}

/// Liveness payload of `GET /`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ServiceInfo {
    pub status: String,
    pub message: String,
    pub version: String,
    pub features: Vec<String>,
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct HealthReport {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents_supported: Option<Vec<Intent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
