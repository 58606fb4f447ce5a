use libsql::{params, Connection};
use serde_json::Value;

use crate::db::traits::RecordCollection;
use crate::error::Result;

pub struct RecordRepository;

impl RecordRepository {
    /// All records of a collection in insertion order.
    pub async fn list(conn: &Connection, collection: RecordCollection) -> Result<Vec<Value>> {
        let sql = format!("SELECT data FROM {} ORDER BY id", collection.as_str());
        let mut rows = conn.query(&sql, ()).await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(serde_json::from_str(&row.get::<String>(0)?)?);
        }
        Ok(records)
    }

    pub async fn delete_all(conn: &Connection, collection: RecordCollection) -> Result<u64> {
        let sql = format!("DELETE FROM {}", collection.as_str());
        Ok(conn.execute(&sql, ()).await?)
    }

    /// Insert one record. A reservation whose `reservation_id` is already
    /// stored is skipped and `false` is returned.
    pub async fn insert(
        conn: &Connection,
        collection: RecordCollection,
        record: &Value,
    ) -> Result<bool> {
        let data = serde_json::to_string(record)?;

        match collection {
            RecordCollection::Reservations => {
                let reservation_id = record
                    .get("reservation_id")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let affected = conn
                    .execute(
                        r#"
                        INSERT INTO reservations (reservation_id, data) VALUES (?1, ?2)
                        ON CONFLICT(reservation_id) DO NOTHING
                        "#,
                        params![reservation_id.clone(), data],
                    )
                    .await?;
                if affected == 0 {
                    tracing::warn!(
                        reservation_id = reservation_id.as_deref().unwrap_or_default(),
                        "Skipped reservation with duplicate id"
                    );
                }
                Ok(affected > 0)
            }
            other => {
                let sql = format!("INSERT INTO {} (data) VALUES (?1)", other.as_str());
                conn.execute(&sql, params![data]).await?;
                Ok(true)
            }
        }
    }

    /// Clear the collection, then insert every record. Returns how many rows
    /// were stored.
    pub async fn replace_all(
        conn: &Connection,
        collection: RecordCollection,
        records: &[Value],
    ) -> Result<u64> {
        let removed = Self::delete_all(conn, collection).await?;
        tracing::debug!(%collection, removed, "Cleared collection");

        let mut inserted = 0;
        for record in records {
            if Self::insert(conn, collection, record).await? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
