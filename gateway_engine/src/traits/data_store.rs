use crate::{db_types::DataRecord, traits::StoreError};

/// The `DataStore` trait defines append and query access to the payload collection.
///
/// Records are immutable once written; there is no update or delete primitive. Every query is scoped to a
/// single owner, so a backend can never be asked to return another principal's records.
#[allow(async_fn_in_trait)]
pub trait DataStore {
    /// Append a new payload document. The record carries a pre-generated [`crate::db_types::RecordId`];
    /// backends must reject duplicates rather than overwrite.
    async fn insert_record(&self, record: &DataRecord) -> Result<(), StoreError>;

    /// Fetch up to `limit` records owned by `uid`, newest first.
    async fn fetch_records_for_user(&self, uid: &str, limit: usize) -> Result<Vec<DataRecord>, StoreError>;
}
