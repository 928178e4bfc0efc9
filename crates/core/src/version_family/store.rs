use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::UserId;
use crate::version_family::VersionFamily;

/// Precondition attached to a family save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteGuard {
    /// Overwrite whatever is stored.
    Unconditional,
    /// Save only if the stored revision equals this value. A revision of 0
    /// expects the family not to exist yet.
    ExpectRevision(i64),
}

/// Persistence for version-family aggregates.
///
/// A save writes the whole aggregate at once; implementations must never
/// persist `versions`, `current` and `disabled_versions` separately.
#[async_trait]
pub trait VersionFamilyStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<VersionFamily>, StoreError>;

    /// The family containing `version_id`, if any.
    async fn find_by_member_version(
        &self,
        version_id: &str,
    ) -> Result<Option<VersionFamily>, StoreError>;

    /// Families owned by `owner`, or global families when `owner` is `None`.
    async fn find_by_owner(&self, owner: Option<&str>) -> Result<Vec<VersionFamily>, StoreError>;

    /// Every family whose owner is not in `excluded_owners`. Global families
    /// are always included.
    async fn find_all_except_owners(
        &self,
        excluded_owners: &[UserId],
    ) -> Result<Vec<VersionFamily>, StoreError>;

    /// Persist `family` and return its new revision.
    ///
    /// Fails with [`StoreError::RevisionConflict`] when `guard` is not met.
    async fn save(&self, family: &VersionFamily, guard: WriteGuard) -> Result<i64, StoreError>;
}
