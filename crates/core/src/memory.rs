//! In-process store implementations.
//!
//! Both stores keep their rows behind a tokio `RwLock` and are safe to share
//! through an `Arc`. They back the manager tests and single-node embeddings
//! that do not need durable state.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::lock::{LockRecord, LockStore};
use crate::types::{FamilyId, ObjectId, UserId};
use crate::version_family::{VersionFamily, VersionFamilyStore, WriteGuard};

// ---------------------------------------------------------------------------
// MemoryLockStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryLockStore {
    records: RwLock<HashMap<ObjectId, LockRecord>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, stale ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn find(&self, object_id: &str) -> Result<Option<LockRecord>, StoreError> {
        Ok(self.records.read().await.get(object_id).cloned())
    }

    async fn upsert(&self, record: &LockRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.object_id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, object_id: &str) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(object_id).is_some())
    }
}

// ---------------------------------------------------------------------------
// MemoryVersionFamilyStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryVersionFamilyStore {
    families: RwLock<HashMap<FamilyId, VersionFamily>>,
}

impl MemoryVersionFamilyStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect_where<F>(&self, predicate: F) -> Vec<VersionFamily>
    where
        F: Fn(&VersionFamily) -> bool,
    {
        self.families
            .read()
            .await
            .values()
            .filter(|family| predicate(family))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VersionFamilyStore for MemoryVersionFamilyStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<VersionFamily>, StoreError> {
        Ok(self.families.read().await.get(id).cloned())
    }

    async fn find_by_member_version(
        &self,
        version_id: &str,
    ) -> Result<Option<VersionFamily>, StoreError> {
        Ok(self
            .families
            .read()
            .await
            .values()
            .filter(|family| family.contains(version_id))
            .min_by(|a, b| a.id().cmp(b.id()))
            .cloned())
    }

    async fn find_by_owner(&self, owner: Option<&str>) -> Result<Vec<VersionFamily>, StoreError> {
        Ok(self.collect_where(|family| family.owner() == owner).await)
    }

    async fn find_all_except_owners(
        &self,
        excluded_owners: &[UserId],
    ) -> Result<Vec<VersionFamily>, StoreError> {
        Ok(self
            .collect_where(|family| match family.owner() {
                Some(owner) => !excluded_owners.iter().any(|excluded| excluded == owner),
                None => true,
            })
            .await)
    }

    async fn save(&self, family: &VersionFamily, guard: WriteGuard) -> Result<i64, StoreError> {
        let mut families = self.families.write().await;
        let stored_revision = families.get(family.id()).map_or(0, VersionFamily::revision);

        if let WriteGuard::ExpectRevision(expected) = guard {
            if expected != stored_revision {
                return Err(StoreError::RevisionConflict {
                    family_id: family.id().to_string(),
                    expected,
                });
            }
        }

        let revision = stored_revision + 1;
        let mut saved = family.clone();
        saved.set_revision(revision);
        families.insert(saved.id().to_string(), saved);
        Ok(revision)
    }
}
