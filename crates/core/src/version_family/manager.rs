use std::sync::Arc;

use uuid::Uuid;

use crate::access::AccessGate;
use crate::config::{CurationConfig, FamilyWriteMode};
use crate::error::{CoreError, StoreError};
use crate::roles::Role;
use crate::types::UserId;
use crate::user::User;
use crate::version_family::{VersionFamily, VersionFamilyStore, WriteGuard};

/// Ownership-gated access to the version-family state machine.
///
/// Every mutation works on a copy of the caller's family, persists the whole
/// aggregate, and only then replaces the caller's value. A failed save leaves
/// the caller's family untouched.
pub struct VersionFamilyManager {
    store: Arc<dyn VersionFamilyStore>,
    gate: AccessGate,
    write_mode: FamilyWriteMode,
}

impl VersionFamilyManager {
    pub fn new(
        store: Arc<dyn VersionFamilyStore>,
        gate: AccessGate,
        write_mode: FamilyWriteMode,
    ) -> Self {
        Self {
            store,
            gate,
            write_mode,
        }
    }

    pub fn from_config(store: Arc<dyn VersionFamilyStore>, config: &CurationConfig) -> Self {
        Self::new(
            store,
            AccessGate::from_config(config),
            config.family_write_mode,
        )
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Start a new lineage whose only (and current) version is `first_version_id`.
    pub async fn create_family(
        &self,
        first_version_id: &str,
        owner: Option<&str>,
        user: &User,
    ) -> Result<VersionFamily, CoreError> {
        let scope = match owner {
            Some(owner) => format!("version families of user {owner}"),
            None => "global version families".to_string(),
        };
        self.gate.ensure_write(owner, user, &scope)?;
        self.ensure_unclaimed(first_version_id, None, user).await?;

        let mut family = VersionFamily::new(
            Uuid::now_v7().to_string(),
            owner.map(str::to_string),
            first_version_id,
        )?;
        let revision = self
            .store
            .save(&family, self.guard_for(&family))
            .await
            .map_err(conflict_to_core)?;
        family.set_revision(revision);

        tracing::info!(
            family_id = %family.id(),
            owner = ?family.owner(),
            version_id = first_version_id,
            user_id = %user.id,
            "Version family created"
        );
        Ok(family)
    }

    /// Append `new_version_id` and make it current.
    pub async fn insert_version(
        &self,
        family: &mut VersionFamily,
        new_version_id: &str,
        user: &User,
    ) -> Result<(), CoreError> {
        self.ensure_writable(family, user)?;

        let mut updated = family.clone();
        updated.apply_insert(new_version_id)?;
        self.ensure_unclaimed(new_version_id, Some(family.id()), user)
            .await?;
        self.commit(family, updated).await?;

        tracing::info!(
            family_id = %family.id(),
            version_id = new_version_id,
            user_id = %user.id,
            "Version inserted"
        );
        Ok(())
    }

    pub async fn set_current(
        &self,
        family: &mut VersionFamily,
        version_id: &str,
        user: &User,
    ) -> Result<(), CoreError> {
        self.ensure_writable(family, user)?;

        let mut updated = family.clone();
        updated.apply_set_current(version_id)?;
        self.commit(family, updated).await?;

        tracing::info!(
            family_id = %family.id(),
            version_id,
            user_id = %user.id,
            "Current version set"
        );
        Ok(())
    }

    /// Disable one version. The current pointer is not reassigned, so
    /// disabling the current version leaves it current until the caller
    /// picks another one with [`set_current`](Self::set_current).
    pub async fn disable_version(
        &self,
        family: &mut VersionFamily,
        version_id: &str,
        user: &User,
    ) -> Result<(), CoreError> {
        self.ensure_writable(family, user)?;

        let mut updated = family.clone();
        updated.apply_disable_version(version_id)?;
        self.commit(family, updated).await?;

        if family.has_disabled_current() {
            tracing::warn!(
                family_id = %family.id(),
                version_id,
                "Current version disabled; family has no active current version"
            );
        }
        tracing::info!(
            family_id = %family.id(),
            version_id,
            user_id = %user.id,
            "Version disabled"
        );
        Ok(())
    }

    pub async fn restore_version(
        &self,
        family: &mut VersionFamily,
        version_id: &str,
        user: &User,
    ) -> Result<(), CoreError> {
        self.ensure_writable(family, user)?;

        let mut updated = family.clone();
        updated.apply_restore_version(version_id)?;
        self.commit(family, updated).await?;

        tracing::info!(
            family_id = %family.id(),
            version_id,
            user_id = %user.id,
            "Version restored"
        );
        Ok(())
    }

    pub async fn disable_family(
        &self,
        family: &mut VersionFamily,
        user: &User,
    ) -> Result<(), CoreError> {
        self.ensure_writable(family, user)?;

        let mut updated = family.clone();
        updated.apply_disable_family();
        self.commit(family, updated).await?;

        tracing::info!(family_id = %family.id(), user_id = %user.id, "Version family disabled");
        Ok(())
    }

    pub async fn restore_family(
        &self,
        family: &mut VersionFamily,
        user: &User,
    ) -> Result<(), CoreError> {
        self.ensure_writable(family, user)?;

        let mut updated = family.clone();
        updated.apply_restore_family();
        self.commit(family, updated).await?;

        tracing::info!(family_id = %family.id(), user_id = %user.id, "Version family restored");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub async fn get_by_id(&self, family_id: &str, user: &User) -> Result<VersionFamily, CoreError> {
        let family = self
            .store
            .find_by_id(family_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "version family",
                id: family_id.to_string(),
            })?;
        self.ensure_readable(&family, user)?;
        Ok(family)
    }

    /// The family `version_id` belongs to.
    pub async fn get_by_version(
        &self,
        version_id: &str,
        user: &User,
    ) -> Result<VersionFamily, CoreError> {
        let family = self
            .store
            .find_by_member_version(version_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "version",
                id: version_id.to_string(),
            })?;
        self.ensure_readable(&family, user)?;
        Ok(family)
    }

    // -----------------------------------------------------------------------
    // Enumeration (filters, never denies)
    // -----------------------------------------------------------------------

    pub async fn list_global(&self, user: &User) -> Result<Vec<VersionFamily>, CoreError> {
        let families = self.store.find_by_owner(None).await?;
        Ok(self.visible(families, user))
    }

    /// Global families that are not disabled.
    pub async fn list_active_global(&self, user: &User) -> Result<Vec<VersionFamily>, CoreError> {
        let mut families = self.list_global(user).await?;
        families.retain(|family| !family.is_family_disabled());
        Ok(families)
    }

    pub async fn list_owned_by(
        &self,
        user: &User,
        target_user_id: &str,
    ) -> Result<Vec<VersionFamily>, CoreError> {
        let families = self.store.find_by_owner(Some(target_user_id)).await?;
        Ok(self.visible(families, user))
    }

    pub async fn list_all_except(
        &self,
        user: &User,
        excluded_owner_ids: &[UserId],
    ) -> Result<Vec<VersionFamily>, CoreError> {
        let families = self.store.find_all_except_owners(excluded_owner_ids).await?;
        Ok(self.visible(families, user))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn visible(&self, mut families: Vec<VersionFamily>, user: &User) -> Vec<VersionFamily> {
        if user.role() != Role::Superuser {
            families.retain(|family| self.gate.can_read(family.owner(), user));
        }
        families.sort_by(|a, b| a.id().cmp(b.id()));
        families
    }

    fn ensure_readable(&self, family: &VersionFamily, user: &User) -> Result<(), CoreError> {
        self.gate
            .ensure_read(family.owner(), user, &format!("version family {}", family.id()))
    }

    fn ensure_writable(&self, family: &VersionFamily, user: &User) -> Result<(), CoreError> {
        self.gate
            .ensure_write(family.owner(), user, &format!("version family {}", family.id()))
    }

    /// A version may belong to at most one family.
    ///
    /// The claiming family is only named when `user` may read it.
    async fn ensure_unclaimed(
        &self,
        version_id: &str,
        family_id: Option<&str>,
        user: &User,
    ) -> Result<(), CoreError> {
        match self.store.find_by_member_version(version_id).await? {
            Some(other) if Some(other.id()) != family_id => {
                let message = if self.gate.can_read(other.owner(), user) {
                    format!("Version '{version_id}' already belongs to family {}", other.id())
                } else {
                    format!("Version '{version_id}' already belongs to another family")
                };
                Err(CoreError::Validation(message))
            }
            _ => Ok(()),
        }
    }

    fn guard_for(&self, family: &VersionFamily) -> WriteGuard {
        match self.write_mode {
            FamilyWriteMode::LastWriteWins => WriteGuard::Unconditional,
            FamilyWriteMode::CompareAndSwap => WriteGuard::ExpectRevision(family.revision()),
        }
    }

    async fn commit(
        &self,
        family: &mut VersionFamily,
        mut updated: VersionFamily,
    ) -> Result<(), CoreError> {
        let revision = self
            .store
            .save(&updated, self.guard_for(family))
            .await
            .map_err(conflict_to_core)?;
        updated.set_revision(revision);
        *family = updated;
        Ok(())
    }
}

fn conflict_to_core(err: StoreError) -> CoreError {
    match err {
        StoreError::RevisionConflict { family_id, expected } => {
            tracing::warn!(%family_id, expected, "Version family save lost a revision race");
            CoreError::Conflict(format!(
                "Version family {family_id} changed since revision {expected}; reload and retry"
            ))
        }
        other => CoreError::Store(other),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
