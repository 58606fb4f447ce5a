use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tokio::sync::Mutex;
use validator::Validate;

use crate::db::DatabaseBackend;
use crate::error::{ConciergeError, Result};
use crate::models::{
    format_reservation_id, nightly_rate, CreateReservationRequest, Reservation,
    ReservationCreated, RESERVATION_ID_PREFIX,
};

const MAX_ID_ATTEMPTS: u32 = 5;
const CREATED_MESSAGE: &str = "Demande de réservation créée avec succès";

/// Turns booking-form submissions into stored reservation requests.
#[derive(Clone)]
pub struct ReservationService {
    db: Arc<dyn DatabaseBackend>,
    /// Serializes count-then-insert within this process. The unique index
    /// still guards against other writers.
    allocation: Arc<Mutex<()>>,
}

impl ReservationService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self {
            db,
            allocation: Arc::new(Mutex::new(())),
        }
    }

    pub async fn create(&self, request: CreateReservationRequest) -> Result<ReservationCreated> {
        self.create_at(request, Local::now().naive_local()).await
    }

    /// Create a reservation as if submitted at `now` (local time).
    pub async fn create_at(
        &self,
        request: CreateReservationRequest,
        now: NaiveDateTime,
    ) -> Result<ReservationCreated> {
        request
            .validate()
            .map_err(|e| ConciergeError::Validation(e.to_string()))?;

        let check_in = parse_date("check_in", &request.check_in)?;
        let check_out = parse_date("check_out", &request.check_out)?;
        let nights = (check_out - check_in).num_days();
        if nights <= 0 {
            return Err(ConciergeError::Validation(
                "check_out must be after check_in".to_string(),
            ));
        }
        let total_amount = nights * nightly_rate(&request.room_type);

        let date_part = now.format("%Y%m%d").to_string();
        let mut reservation = Reservation {
            reservation_id: String::new(),
            guest_name: request.guest_name,
            email: request.email,
            phone: request.phone,
            room_id: None,
            room_type: request.room_type,
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            status: "pending".to_string(),
            total_amount,
            payment_status: "pending".to_string(),
            special_requests: request.special_requests,
            add_ons: Vec::new(),
            created_at: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            source: "chatbot".to_string(),
        };

        let day_prefix = format!("{RESERVATION_ID_PREFIX}-{date_part}");
        let mut last_sequence = 0;
        let _guard = self.allocation.lock().await;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let existing = self.db.count_reservations_matching(&day_prefix).await?;
            let sequence = (existing + 1).max(last_sequence + 1);
            reservation.reservation_id = format_reservation_id(&date_part, sequence);

            if self.db.insert_reservation(&reservation).await? {
                tracing::info!(
                    reservation_id = %reservation.reservation_id,
                    nights,
                    total_amount,
                    "Created reservation"
                );
                return Ok(ReservationCreated {
                    success: true,
                    reservation_id: reservation.reservation_id,
                    total_amount,
                    nights,
                    message: CREATED_MESSAGE.to_string(),
                });
            }

            tracing::debug!(
                reservation_id = %reservation.reservation_id,
                attempt,
                "Reservation id already taken, retrying"
            );
            last_sequence = sequence;
        }

        Err(ConciergeError::Internal(format!(
            "Could not allocate a reservation id for {date_part} after {MAX_ID_ATTEMPTS} attempts"
        )))
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ConciergeError::Validation(format!("{field} must be a date in YYYY-MM-DD format"))
    })
}
