use std::fmt::Debug;

use log::debug;

use crate::{db_types::UserRecord, traits::StoreError, UserStore};

/// API for per-principal profile documents.
pub struct ProfileApi<B> {
    db: B,
}

impl<B: Debug> Debug for ProfileApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProfileApi ({:?})", self.db)
    }
}

impl<B> ProfileApi<B>
where B: UserStore
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetch the profile for `uid`, creating it from the principal's email on first access.
    ///
    /// This is an explicit two-step operation: a read, followed by a conditional put if the read came back
    /// empty. Two concurrent first requests for the same new principal may both reach the put, but the
    /// backend's create-if-absent semantics guarantee that exactly one record is created and that both
    /// callers observe it. Apart from that first-call creation the operation is idempotent.
    pub async fn fetch_or_create_user(&self, uid: &str, email: Option<&str>) -> Result<UserRecord, StoreError> {
        if let Some(existing) = self.db.fetch_user(uid).await? {
            return Ok(existing);
        }
        debug!("🗃️ No profile found for {uid}. Creating one.");
        let user = UserRecord::new(uid, email);
        self.db.create_user_if_absent(&user).await
    }
}
