//! Error body shared by every endpoint.
//!
//! Errors are returned as `{"detail": "..."}` with the matching HTTP status.
//! Internal failures never leak their cause; it is logged instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ConciergeError;

/// Generic message for failures the client cannot act on.
pub const INTERNAL_ERROR_DETAIL: &str = "An internal error occurred";

/// Wire shape of an error response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable description safe to display to end users.
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

impl From<ConciergeError> for ApiError {
    fn from(err: ConciergeError) -> Self {
        match err {
            ConciergeError::Validation(msg) => ApiError::bad_request(msg),
            ConciergeError::NotFound(msg) => ApiError::new(StatusCode::NOT_FOUND, msg),
            ConciergeError::ApiRateLimit { retry_after }
            | ConciergeError::LlmRateLimit { retry_after } => {
                let msg = match retry_after {
                    Some(secs) => format!("Rate limit exceeded, retry after {secs} seconds"),
                    None => "Rate limit exceeded".to_string(),
                };
                ApiError::new(StatusCode::TOO_MANY_REQUESTS, msg)
            }
            ConciergeError::LlmUnavailable(reason) => {
                tracing::warn!(reason = %reason, "LLM unavailable");
                ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable",
                )
            }
            other => {
                tracing::error!(error = %other, "Internal error mapped to response");
                ApiError::internal(INTERNAL_ERROR_DETAIL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_bad_request_with_detail() {
        let response =
            ApiError::from(ConciergeError::Validation("Question cannot be empty".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": "Question cannot be empty"})
        );
    }

    #[tokio::test]
    async fn internal_errors_are_opaque() {
        let response =
            ApiError::from(ConciergeError::Embedding("upstream exploded".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["detail"], INTERNAL_ERROR_DETAIL);
    }

    #[test]
    fn rate_limits_keep_retry_hint() {
        let err = ApiError::from(ConciergeError::LlmRateLimit {
            retry_after: Some(7),
        });
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(err.detail().contains("7 seconds"));
    }
}
