//! `curator_core` store traits backed by PostgreSQL.

use async_trait::async_trait;
use curator_core::error::StoreError;
use curator_core::lock::{LockRecord, LockStore};
use curator_core::types::UserId;
use curator_core::version_family::{VersionFamily, VersionFamilyStore, WriteGuard};

use crate::models::version_family::VersionFamilyRow;
use crate::repositories::{FamilyWrite, ObjectLockRepo, VersionFamilyRepo};
use crate::DbPool;

fn store_err(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Database error");
    StoreError::backend(err)
}

fn to_family(row: VersionFamilyRow) -> Result<VersionFamily, StoreError> {
    let id = row.id.clone();
    VersionFamily::try_from(row).map_err(|err| {
        tracing::error!(family_id = %id, error = %err, "Corrupt version family row");
        StoreError::Backend(format!("Corrupt version family row {id}: {err}"))
    })
}

fn to_families(rows: Vec<VersionFamilyRow>) -> Result<Vec<VersionFamily>, StoreError> {
    rows.into_iter().map(to_family).collect()
}

// ---------------------------------------------------------------------------
// PgLockStore
// ---------------------------------------------------------------------------

/// Lock records in the `object_locks` table.
#[derive(Debug, Clone)]
pub struct PgLockStore {
    pool: DbPool,
}

impl PgLockStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LockStore for PgLockStore {
    async fn find(&self, object_id: &str) -> Result<Option<LockRecord>, StoreError> {
        let row = ObjectLockRepo::find(&self.pool, object_id)
            .await
            .map_err(store_err)?;
        Ok(row.map(LockRecord::from))
    }

    async fn upsert(&self, record: &LockRecord) -> Result<(), StoreError> {
        ObjectLockRepo::upsert(
            &self.pool,
            &record.object_id,
            &record.holder_user_id,
            record.acquired_at,
        )
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn delete(&self, object_id: &str) -> Result<bool, StoreError> {
        ObjectLockRepo::delete(&self.pool, object_id)
            .await
            .map_err(store_err)
    }
}

// ---------------------------------------------------------------------------
// PgVersionFamilyStore
// ---------------------------------------------------------------------------

/// Version family aggregates in the `version_families` table.
#[derive(Debug, Clone)]
pub struct PgVersionFamilyStore {
    pool: DbPool,
}

impl PgVersionFamilyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionFamilyStore for PgVersionFamilyStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<VersionFamily>, StoreError> {
        VersionFamilyRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_err)?
            .map(to_family)
            .transpose()
    }

    async fn find_by_member_version(
        &self,
        version_id: &str,
    ) -> Result<Option<VersionFamily>, StoreError> {
        VersionFamilyRepo::find_by_member_version(&self.pool, version_id)
            .await
            .map_err(store_err)?
            .map(to_family)
            .transpose()
    }

    async fn find_by_owner(&self, owner: Option<&str>) -> Result<Vec<VersionFamily>, StoreError> {
        let rows = VersionFamilyRepo::find_by_owner(&self.pool, owner)
            .await
            .map_err(store_err)?;
        to_families(rows)
    }

    async fn find_all_except_owners(
        &self,
        excluded_owners: &[UserId],
    ) -> Result<Vec<VersionFamily>, StoreError> {
        let rows = VersionFamilyRepo::find_all_except_owners(&self.pool, excluded_owners)
            .await
            .map_err(store_err)?;
        to_families(rows)
    }

    async fn save(&self, family: &VersionFamily, guard: WriteGuard) -> Result<i64, StoreError> {
        let input = FamilyWrite::from(family);

        let expected = match guard {
            WriteGuard::Unconditional => {
                return VersionFamilyRepo::upsert(&self.pool, &input)
                    .await
                    .map_err(store_err);
            }
            WriteGuard::ExpectRevision(expected) => expected,
        };

        let saved = if expected == 0 {
            VersionFamilyRepo::insert_new(&self.pool, &input).await
        } else {
            VersionFamilyRepo::update_if_revision(&self.pool, &input, expected).await
        }
        .map_err(store_err)?;

        saved.ok_or_else(|| StoreError::RevisionConflict {
            family_id: family.id().to_string(),
            expected,
        })
    }
}
