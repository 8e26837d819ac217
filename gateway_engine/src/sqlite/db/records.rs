use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use crate::{db_types::DataRecord, traits::StoreError};

pub async fn insert_record(record: &DataRecord, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let payload = serde_json::to_string(&record.data)?;
    sqlx::query("INSERT INTO data_records (id, user_id, payload, created_at) VALUES (?, ?, ?, ?)")
        .bind(record.id.as_str())
        .bind(&record.user_id)
        .bind(payload)
        .bind(record.created_at)
        .execute(conn)
        .await?;
    Ok(())
}

/// Records owned by `uid`, newest first. The rowid tie-break keeps the ordering stable when two records
/// carry the same timestamp.
pub async fn records_for_user(
    uid: &str,
    limit: usize,
    conn: &mut SqliteConnection,
) -> Result<Vec<DataRecord>, StoreError> {
    trace!("🗃️ Fetching up to {limit} records for [{uid}]");
    let rows = sqlx::query(
        r#"SELECT id, user_id, payload, created_at FROM data_records
           WHERE user_id = ?
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?"#,
    )
    .bind(uid)
    .bind(limit as i64)
    .fetch_all(conn)
    .await?;
    rows.into_iter().map(record_from_row).collect()
}

fn record_from_row(row: SqliteRow) -> Result<DataRecord, StoreError> {
    let id: String = row.try_get("id")?;
    let payload: String = row.try_get("payload")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(DataRecord {
        id: id.into(),
        user_id: row.try_get("user_id")?,
        data: serde_json::from_str(&payload)?,
        created_at,
    })
}
