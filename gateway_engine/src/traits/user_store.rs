use crate::{db_types::UserRecord, traits::StoreError};

/// The `UserStore` trait defines keyed access to the profile collection.
///
/// A profile document is keyed by the owning principal's identifier. Backends must treat the key as
/// immutable: once a record exists for a `uid`, writes for that `uid` never replace it.
#[allow(async_fn_in_trait)]
pub trait UserStore {
    /// Fetch the profile document for the given principal id. Returns `None` if no record exists.
    async fn fetch_user(&self, uid: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Conditional put: persist `user` only if no record exists for its `uid` yet, and return the record
    /// that is stored afterwards. When two callers race on the same new `uid`, exactly one write lands and
    /// both callers receive the winning record.
    async fn create_user_if_absent(&self, user: &UserRecord) -> Result<UserRecord, StoreError>;
}
