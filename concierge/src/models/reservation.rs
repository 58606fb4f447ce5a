use serde::{Deserialize, Serialize};
use validator::Validate;

/// Prefix of every reservation identifier.
pub const RESERVATION_ID_PREFIX: &str = "SC";

/// Nightly rate for a room type, in euros. Unknown types use the default rate.
pub fn nightly_rate(room_type: &str) -> i64 {
    match room_type {
        "standard" => 89,
        "superior" => 115,
        "family" => 145,
        _ => 100,
    }
}

/// Build the identifier `SC-{YYYYMMDD}-{NNN}` for the `sequence`-th
/// reservation of a day.
pub fn format_reservation_id(date_part: &str, sequence: u64) -> String {
    format!("{RESERVATION_ID_PREFIX}-{date_part}-{sequence:03}")
}

fn default_special_requests() -> Option<String> {
    Some(String::new())
}

/// Reservation request submitted by the booking form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "guest_name must not be empty"))]
    pub guest_name: String,
    #[validate(contains(pattern = "@", message = "email must contain '@'"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone must not be empty"))]
    pub phone: String,
    /// Arrival date, `YYYY-MM-DD`.
    pub check_in: String,
    /// Departure date, `YYYY-MM-DD`.
    pub check_out: String,
    pub room_type: String,
    #[validate(range(min = 1, message = "guests must be at least 1"))]
    pub guests: i64,
    #[serde(default = "default_special_requests")]
    pub special_requests: Option<String>,
}

/// A stored reservation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: String,
    pub guest_name: String,
    pub email: String,
    pub phone: String,
    /// Assigned by staff once the request is confirmed.
    pub room_id: Option<String>,
    pub room_type: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: i64,
    pub status: String,
    pub total_amount: i64,
    pub payment_status: String,
    pub special_requests: Option<String>,
    pub add_ons: Vec<serde_json::Value>,
    pub created_at: String,
    pub source: String,
}

/// Response body of a successful reservation creation.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReservationCreated {
    pub success: bool,
    pub reservation_id: String,
    pub total_amount: i64,
    pub nights: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_json(extra: &str) -> String {
        format!(
            r#"{{"guest_name":"Camille Martin","email":"camille@example.fr","phone":"+33 6 12 34 56 78",
                "check_in":"2026-01-10","check_out":"2026-01-12","room_type":"standard","guests":2{extra}}}"#
        )
    }

    #[test]
    fn rates_by_room_type() {
        assert_eq!(nightly_rate("standard"), 89);
        assert_eq!(nightly_rate("superior"), 115);
        assert_eq!(nightly_rate("family"), 145);
        assert_eq!(nightly_rate("penthouse"), 100);
        assert_eq!(nightly_rate("Standard"), 100);
    }

    #[test]
    fn reservation_id_is_zero_padded() {
        assert_eq!(format_reservation_id("20260110", 1), "SC-20260110-001");
        assert_eq!(format_reservation_id("20260110", 42), "SC-20260110-042");
        assert_eq!(format_reservation_id("20260110", 1234), "SC-20260110-1234");
    }

    #[test]
    fn special_requests_default_to_empty() {
        let request: CreateReservationRequest =
            serde_json::from_str(&request_json("")).expect("parse");
        assert_eq!(request.special_requests.as_deref(), Some(""));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let mut request: CreateReservationRequest =
            serde_json::from_str(&request_json("")).expect("parse");
        request.email = "camille.example.fr".to_string();
        request.guests = 0;
        let errors = request.validate().expect_err("should fail");
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("guests"));
    }
}
