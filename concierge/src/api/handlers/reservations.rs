use axum::extract::State;
use axum::Json;

use crate::api::extractors::AppJson;
use crate::api::response::{ApiError, ErrorBody};
use crate::api::state::AppState;
use crate::models::{CreateReservationRequest, ReservationCreated};

pub const RESERVATION_FAILURE_DETAIL: &str = "Erreur lors de la création de la réservation";

/// `POST /api/reservations`
///
/// Record a reservation request from the booking form. Payment and room
/// assignment happen later, outside this service.
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "records",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation request stored", body = ReservationCreated),
        (status = 400, description = "Malformed body or invalid request", body = ErrorBody),
        (status = 500, description = "Reservation could not be stored", body = ErrorBody),
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateReservationRequest>,
) -> Result<Json<ReservationCreated>, ApiError> {
    match state.reservations.create(req).await {
        Ok(created) => Ok(Json(created)),
        Err(e) if e.is_client_error() => Err(ApiError::from(e)),
        Err(e) => {
            tracing::error!(error = %e, "Error creating reservation");
            Err(ApiError::internal(RESERVATION_FAILURE_DETAIL))
        }
    }
}
