use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use crate::{db_types::UserRecord, traits::StoreError};

pub async fn user_by_uid(uid: &str, conn: &mut SqliteConnection) -> Result<Option<UserRecord>, StoreError> {
    trace!("🗃️ Fetching profile for [{uid}]");
    let row = sqlx::query("SELECT uid, email, created_at, last_login FROM user_records WHERE uid = ?")
        .bind(uid)
        .fetch_optional(conn)
        .await?;
    row.map(user_from_row).transpose()
}

/// Insert the profile record iff no record exists for its uid yet. Returns `true` if this call created
/// the record. The `ON CONFLICT DO NOTHING` clause is what makes first-access creation a conditional put
/// rather than a read-then-write race.
pub async fn insert_user_if_absent(user: &UserRecord, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"INSERT INTO user_records (uid, email, created_at, last_login)
           VALUES (?, ?, ?, ?)
           ON CONFLICT (uid) DO NOTHING"#,
    )
    .bind(&user.uid)
    .bind(&user.email)
    .bind(user.created_at)
    .bind(user.last_login)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

fn user_from_row(row: SqliteRow) -> Result<UserRecord, StoreError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let last_login: DateTime<Utc> = row.try_get("last_login")?;
    Ok(UserRecord { uid: row.try_get("uid")?, email: row.try_get("email")?, created_at, last_login })
}
