use chrono::{DateTime, Utc};
use gateway_engine::db_types::{DataRecord, RecordId, UserRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Principal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "healthy".to_string(), message: "Backend API is running".to_string(), timestamp: Utc::now() }
    }
}

/// The subset of a [`Principal`] that is safe to echo back to the caller. The opaque claim mapping is
/// deliberately not part of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalSummary {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

impl From<&Principal> for PrincipalSummary {
    fn from(principal: &Principal) -> Self {
        Self {
            uid: principal.uid.clone(),
            email: principal.email.clone(),
            email_verified: principal.email_verified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: PrincipalSummary,
    pub data: UserRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitDataRequest {
    #[serde(default)]
    pub data: Option<Value>,
}

impl SubmitDataRequest {
    /// Returns the payload if one was actually supplied. Absent and empty payloads (`null`, `""`, `{}`,
    /// `[]`) yield `None`; scalar zero and `false` are real payloads and are kept.
    pub fn into_payload(self) -> Option<Value> {
        let data = self.data?;
        let empty = match &data {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        (!empty).then_some(data)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitDataResponse {
    pub message: String,
    pub id: RecordId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataListResponse {
    pub message: String,
    pub count: usize,
    pub data: Vec<DataRecord>,
}
