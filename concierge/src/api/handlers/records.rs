//! Read-only passthroughs over the operational collections.
//!
//! These endpoints feed the staff dashboard and never fail: a store error
//! is logged and an empty list returned.

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::state::AppState;
use crate::db::RecordCollection;

async fn list_or_empty(state: &AppState, collection: RecordCollection) -> Json<Vec<Value>> {
    match state.db.list_records(collection).await {
        Ok(records) => Json(records),
        Err(e) => {
            tracing::error!(%collection, error = %e, "Error fetching records");
            Json(Vec::new())
        }
    }
}

/// `GET /api/catalog`
#[utoipa::path(
    get,
    path = "/api/catalog",
    tag = "records",
    responses((status = 200, description = "All catalog items", body = Vec<serde_json::Value>))
)]
pub async fn list_catalog(State(state): State<AppState>) -> Json<Vec<Value>> {
    list_or_empty(&state, RecordCollection::Catalog).await
}

/// `GET /api/reservations`
#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "records",
    responses((status = 200, description = "All reservations", body = Vec<serde_json::Value>))
)]
pub async fn list_reservations(State(state): State<AppState>) -> Json<Vec<Value>> {
    list_or_empty(&state, RecordCollection::Reservations).await
}

/// `GET /api/rooms`
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "records",
    responses((status = 200, description = "All rooms", body = Vec<serde_json::Value>))
)]
pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<Value>> {
    list_or_empty(&state, RecordCollection::Rooms).await
}
