use std::fmt::Debug;

use log::debug;
use serde_json::Value;

use crate::{
    db_types::{DataRecord, RecordId},
    traits::StoreError,
    DataStore,
};

/// The fixed page size for record listings. There is no pagination cursor; callers only ever see the
/// newest `MAX_PAGE_SIZE` records.
pub const MAX_PAGE_SIZE: usize = 10;

/// API for user-submitted payload documents.
pub struct DataApi<B> {
    db: B,
}

impl<B: Debug> Debug for DataApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataApi ({:?})", self.db)
    }
}

impl<B> DataApi<B>
where B: DataStore
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Stamp `data` with the owning principal and the current timestamp, persist it, and return the
    /// generated record id. The payload itself is treated as opaque.
    pub async fn submit(&self, uid: &str, data: Value) -> Result<RecordId, StoreError> {
        let record = DataRecord::new(uid, data);
        self.db.insert_record(&record).await?;
        debug!("🗃️ Stored record {} for {uid}", record.id);
        Ok(record.id)
    }

    /// The newest records owned by `uid`, capped at [`MAX_PAGE_SIZE`]. Scoping by the verified principal
    /// id happens here; callers cannot widen the query.
    pub async fn latest_records(&self, uid: &str) -> Result<Vec<DataRecord>, StoreError> {
        self.db.fetch_records_for_user(uid, MAX_PAGE_SIZE).await
    }
}
