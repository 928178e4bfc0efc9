//! Pessimistic object locks with lazy time-to-live expiry.
//!
//! A [`LockRecord`] exists for every locked object; no record means unlocked.
//! Records are created by [`LockManager::set_lock`], removed by the holder via
//! [`LockManager::release_lock`], and discarded lazily once older than the
//! configured TTL. There is no background sweep.

mod manager;
mod store;

pub use manager::LockManager;
pub use store::LockStore;

use serde::{Deserialize, Serialize};

use crate::types::{ObjectId, Timestamp, UserId};

/// One currently-held object lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub object_id: ObjectId,
    pub holder_user_id: UserId,
    pub acquired_at: Timestamp,
}

impl LockRecord {
    /// A record is stale once its age reaches `ttl`.
    pub fn is_stale(&self, now: Timestamp, ttl: chrono::Duration) -> bool {
        now - self.acquired_at >= ttl
    }

    /// When this record stops protecting its object.
    pub fn expires_at(&self, ttl: chrono::Duration) -> Timestamp {
        self.acquired_at + ttl
    }
}

/// Something that can be locked: an identity plus an optional owner.
///
/// The owner feeds the access gate, so only users allowed to write the
/// resource may lock it.
pub trait Lockable {
    fn lock_id(&self) -> &str;
    fn owner(&self) -> Option<&str>;
}

/// A plain lockable reference for objects managed outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTarget<'a> {
    pub object_id: &'a str,
    pub owner: Option<&'a str>,
}

impl<'a> LockTarget<'a> {
    pub fn global(object_id: &'a str) -> Self {
        Self {
            object_id,
            owner: None,
        }
    }

    pub fn owned(object_id: &'a str, owner: &'a str) -> Self {
        Self {
            object_id,
            owner: Some(owner),
        }
    }
}

impl Lockable for LockTarget<'_> {
    fn lock_id(&self) -> &str {
        self.object_id
    }

    fn owner(&self) -> Option<&str> {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn record_aged(secs: i64) -> (LockRecord, Timestamp) {
        let now = Utc::now();
        let record = LockRecord {
            object_id: "doc-1".to_string(),
            holder_user_id: "u1".to_string(),
            acquired_at: now - Duration::seconds(secs),
        };
        (record, now)
    }

    #[test]
    fn test_fresh_record_is_live() {
        let (record, now) = record_aged(10);
        assert!(!record.is_stale(now, Duration::seconds(60)));
    }

    #[test]
    fn test_record_at_exact_ttl_is_stale() {
        let (record, now) = record_aged(60);
        assert!(record.is_stale(now, Duration::seconds(60)));
    }

    #[test]
    fn test_expires_at_adds_ttl() {
        let (record, _) = record_aged(0);
        assert_eq!(
            record.expires_at(Duration::seconds(60)) - record.acquired_at,
            Duration::seconds(60)
        );
    }

    #[test]
    fn test_lock_target_constructors() {
        let global = LockTarget::global("doc-1");
        assert_eq!(global.lock_id(), "doc-1");
        assert_eq!(global.owner(), None);

        let owned = LockTarget::owned("doc-2", "u1");
        assert_eq!(owned.owner(), Some("u1"));
    }
}
