use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::access::AccessGate;
use crate::config::CurationConfig;
use crate::error::CoreError;
use crate::lock::{LockRecord, LockStore, Lockable};
use crate::user::User;

/// Serializes conflicting edits to shared objects.
///
/// All operations, for every object, run inside one critical section owned
/// by this instance. Construct one manager per process and share it (e.g. in
/// an `Arc`); two managers over the same store do not exclude each other.
pub struct LockManager {
    store: Arc<dyn LockStore>,
    gate: AccessGate,
    ttl: chrono::Duration,
    section: Mutex<()>,
}

impl LockManager {
    pub fn new(store: Arc<dyn LockStore>, gate: AccessGate, ttl: chrono::Duration) -> Self {
        Self {
            store,
            gate,
            ttl,
            section: Mutex::new(()),
        }
    }

    pub fn from_config(store: Arc<dyn LockStore>, config: &CurationConfig) -> Self {
        Self::new(store, AccessGate::from_config(config), config.lock_ttl())
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Whether `object_id` is locked against `user`.
    ///
    /// Returns `false` when there is no record, when `user` holds it, or when
    /// the record is stale (the stale record is deleted on the way).
    pub async fn is_locked(&self, object_id: &str, user: &User) -> Result<bool, CoreError> {
        let _section = self.section.lock().await;

        let locked = match self.live_record(object_id).await? {
            Some(record) => !user.is(&record.holder_user_id),
            None => false,
        };
        Ok(locked)
    }

    /// The live lock on `object_id`, if any. Discards a stale record.
    pub async fn lock_holder(&self, object_id: &str) -> Result<Option<LockRecord>, CoreError> {
        let _section = self.section.lock().await;
        self.live_record(object_id).await
    }

    /// Acquire the lock on `object` for `user`.
    ///
    /// A no-op returning the existing record if `user` already holds a live
    /// lock. Fails with [`CoreError::LockHeldByOther`] if someone else does.
    pub async fn set_lock(
        &self,
        object: &impl Lockable,
        user: &User,
    ) -> Result<LockRecord, CoreError> {
        let object_id = object.lock_id();
        self.gate
            .ensure_write(object.owner(), user, &format!("object {object_id}"))?;

        let _section = self.section.lock().await;

        if let Some(record) = self.live_record(object_id).await? {
            if user.is(&record.holder_user_id) {
                tracing::debug!(object_id, user_id = %user.id, "Lock already held by caller");
                return Ok(record);
            }
            return Err(CoreError::LockHeldByOther {
                object_id: object_id.to_string(),
                holder_user_id: record.holder_user_id,
            });
        }

        let record = LockRecord {
            object_id: object_id.to_string(),
            holder_user_id: user.id.clone(),
            acquired_at: Utc::now(),
        };
        self.store.upsert(&record).await?;

        tracing::info!(
            object_id,
            user_id = %user.id,
            expires_at = %record.expires_at(self.ttl),
            "Lock acquired"
        );
        Ok(record)
    }

    /// Release `user`'s lock on `object_id`.
    ///
    /// Silently does nothing if `user` is not the holder. Store failures are
    /// logged and discarded so that finishing an edit never fails.
    pub async fn release_lock(&self, object_id: &str, user: &User) {
        let _section = self.section.lock().await;

        match self.release_held(object_id, user).await {
            Ok(true) => tracing::info!(object_id, user_id = %user.id, "Lock released"),
            Ok(false) => {
                tracing::debug!(object_id, user_id = %user.id, "No lock held by caller to release")
            }
            Err(err) => tracing::warn!(
                object_id,
                user_id = %user.id,
                error = %err,
                "Failed to release lock"
            ),
        }
    }

    async fn release_held(&self, object_id: &str, user: &User) -> Result<bool, CoreError> {
        match self.store.find(object_id).await? {
            Some(record) if user.is(&record.holder_user_id) => {
                Ok(self.store.delete(object_id).await?)
            }
            _ => Ok(false),
        }
    }

    /// Must be called with the critical section held.
    async fn live_record(&self, object_id: &str) -> Result<Option<LockRecord>, CoreError> {
        let Some(record) = self.store.find(object_id).await? else {
            return Ok(None);
        };

        if record.is_stale(Utc::now(), self.ttl) {
            tracing::debug!(
                object_id,
                holder_user_id = %record.holder_user_id,
                acquired_at = %record.acquired_at,
                "Discarding stale lock"
            );
            self.store.delete(object_id).await?;
            return Ok(None);
        }
        Ok(Some(record))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
