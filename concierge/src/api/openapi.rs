use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hôtel So'Co Concierge API",
        version = "2.0.0",
        description = "Customer-support chatbot: intent routing, retrieval-augmented answers and reservation requests.",
    ),
    paths(
        handlers::health::root,
        handlers::health::health_check,
        handlers::chat::chat,
        handlers::records::list_catalog,
        handlers::records::list_reservations,
        handlers::records::list_rooms,
        handlers::reservations::create_reservation,
    ),
    components(schemas(
        response::ErrorBody,
        dto::ChatRequest,
        dto::ChatResponse,
        dto::ServiceInfo,
        dto::HealthReport,
        models::Intent,
        models::CreateReservationRequest,
        models::ReservationCreated,
    )),
    tags(
        (name = "health", description = "Liveness and store connectivity"),
        (name = "chat", description = "Guest conversation"),
        (name = "records", description = "Rooms, catalog and reservations"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
