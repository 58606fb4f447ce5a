use axum::extract::State;
use axum::Json;

use crate::api::dto::{ChatRequest, ChatResponse, MAX_QUESTION_CHARS};
use crate::api::extractors::AppJson;
use crate::api::response::{ApiError, ErrorBody};
use crate::api::state::AppState;
use crate::models::ChatOutcome;

pub const CHAT_FAILURE_DETAIL: &str =
    "An error occurred while processing your question. Please try again.";

/// `POST /api/chat`
///
/// Classify a guest message and answer it.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer with detected intent", body = ChatResponse),
        (status = 400, description = "Malformed body, empty or overlong question", body = ErrorBody),
        (status = 500, description = "Knowledge store unreachable", body = ErrorBody),
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    validate_question(&req.question)?;
    tracing::info!(chars = req.question.chars().count(), "Received question");

    let result = state.chat.ask(&req.question).await;

    match &result.outcome {
        ChatOutcome::RetrievalFailed { reason } => {
            tracing::error!(reason = %reason, "Error processing question");
            return Err(ApiError::internal(CHAT_FAILURE_DETAIL));
        }
        ChatOutcome::ClassificationFailed { reason } | ChatOutcome::GenerationFailed { reason } => {
            tracing::warn!(reason = %reason, intent = %result.intent, "Served a degraded answer");
        }
        ChatOutcome::Answered => {}
    }

    Ok(Json(ChatResponse::from(result)))
}

fn validate_question(question: &str) -> Result<(), ApiError> {
    if question.trim().is_empty() {
        return Err(ApiError::bad_request("Question cannot be empty"));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(ApiError::bad_request(format!(
            "Question too long (max {MAX_QUESTION_CHARS} characters)"
        )));
    }
    Ok(())
}
