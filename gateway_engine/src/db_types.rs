use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

//--------------------------------------     RecordId       ----------------------------------------------------------
/// A lightweight wrapper around the generated identifier of a [`DataRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a fresh, globally unique record id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for RecordId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

//--------------------------------------     UserRecord       --------------------------------------------------------
/// The per-principal profile document, keyed by the principal's identifier. It is created lazily on first
/// authenticated access and the `uid` is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl UserRecord {
    /// Construct a new profile record for first-time persistence. Both timestamps are set to "now";
    /// subsequent fetches return the record unmodified.
    pub fn new<S: Into<String>>(uid: S, email: Option<&str>) -> Self {
        let now = Utc::now();
        Self { uid: uid.into(), email: email.map(String::from), created_at: now, last_login: now }
    }
}

//--------------------------------------     DataRecord       --------------------------------------------------------
/// A user-submitted payload document. Records are immutable after creation and are only ever visible to
/// the principal identified by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRecord {
    pub id: RecordId,
    pub user_id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

impl DataRecord {
    /// Stamp a submitted payload with its owner, a generated id and the current timestamp.
    pub fn new<S: Into<String>>(user_id: S, data: Value) -> Self {
        Self { id: RecordId::new(), user_id: user_id.into(), data, created_at: Utc::now() }
    }
}
