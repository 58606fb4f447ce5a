use axum::extract::State;
use axum::Json;

use crate::api::dto::{HealthReport, ServiceInfo};
use crate::api::state::AppState;
use crate::models::Intent;

pub const SERVICE_VERSION: &str = "2.0.0";

const FEATURES: [&str; 6] = [
    "Intent-aware routing",
    "Room availability checks",
    "Reservation requests",
    "Cancellation handling",
    "Hotel information (RAG)",
    "Human escalation",
];

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = ServiceInfo),
    )
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "online".to_string(),
        message: "Hotel Customer Support Chatbot API is running".to_string(),
        version: SERVICE_VERSION.to_string(),
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
    })
}

/// `GET /health`
///
/// Always 200; the body says whether the knowledge store answered.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Store connectivity and supported intents", body = HealthReport),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    let report = match state.db.ping().await {
        Ok(()) => HealthReport {
            status: "healthy".to_string(),
            rag_system: Some("connected".to_string()),
            intents_supported: Some(Intent::CLASSIFIABLE.to_vec()),
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            HealthReport {
                status: "unhealthy".to_string(),
                rag_system: None,
                intents_supported: None,
                error: Some(e.to_string()),
            }
        }
    };

    Json(report)
}
