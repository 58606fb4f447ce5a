use libsql::{params, Connection};

use crate::error::Result;
use crate::models::Reservation;

pub struct ReservationRepository;

impl ReservationRepository {
    pub async fn count_matching(conn: &Connection, fragment: &str) -> Result<u64> {
        let pattern = format!("%{}%", escape_like(fragment));
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM reservations WHERE reservation_id LIKE ?1 ESCAPE '\\'",
                params![pattern],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?.max(0) as u64),
            None => Ok(0),
        }
    }

    /// Insert unless the identifier already exists.
    pub async fn try_create(conn: &Connection, reservation: &Reservation) -> Result<bool> {
        let data = serde_json::to_string(reservation)?;
        let affected = conn
            .execute(
                r#"
                INSERT INTO reservations (reservation_id, data) VALUES (?1, ?2)
                ON CONFLICT(reservation_id) DO NOTHING
                "#,
                params![reservation.reservation_id.clone(), data],
            )
            .await?;
        Ok(affected > 0)
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("SC-20260110"), "SC-20260110");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
