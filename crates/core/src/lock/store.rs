use async_trait::async_trait;

use crate::error::StoreError;
use crate::lock::LockRecord;

/// Persistence for lock records, keyed by object id.
///
/// Implementations need no locking of their own for lock semantics: every
/// read-decide-write sequence runs inside the [`LockManager`] critical section.
///
/// [`LockManager`]: crate::lock::LockManager
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Fetch the record for `object_id`, stale or not.
    async fn find(&self, object_id: &str) -> Result<Option<LockRecord>, StoreError>;

    /// Create or overwrite the record for `record.object_id`.
    async fn upsert(&self, record: &LockRecord) -> Result<(), StoreError>;

    /// Delete the record for `object_id`.
    ///
    /// Returns `true` if a record was removed.
    async fn delete(&self, object_id: &str) -> Result<bool, StoreError>;
}
