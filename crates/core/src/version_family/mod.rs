//! Version families: the ordered revision history of one template lineage.
//!
//! A [`VersionFamily`] records every version ever inserted (append-only), the
//! current version, which versions are disabled, and whether the whole family
//! is disabled. State transitions live on the aggregate and are pure; the
//! [`VersionFamilyManager`] gates them by ownership and persists the result.

mod manager;
mod store;

pub use manager::VersionFamilyManager;
pub use store::{VersionFamilyStore, WriteGuard};

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::lock::Lockable;
use crate::types::{FamilyId, UserId, VersionId};

/// Aggregate root for one template lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionFamily {
    id: FamilyId,
    owner: Option<UserId>,
    versions: Vec<VersionId>,
    current: VersionId,
    disabled_versions: BTreeSet<VersionId>,
    is_family_disabled: bool,
    revision: i64,
}

impl VersionFamily {
    /// A new, never-persisted family holding a single active version.
    pub fn new(
        id: impl Into<FamilyId>,
        owner: Option<UserId>,
        first_version: impl Into<VersionId>,
    ) -> Result<Self, CoreError> {
        let first_version = first_version.into();
        validate_version_id(&first_version)?;
        Ok(Self {
            id: id.into(),
            owner,
            versions: vec![first_version.clone()],
            current: first_version,
            disabled_versions: BTreeSet::new(),
            is_family_disabled: false,
            revision: 0,
        })
    }

    /// Rebuild a family from persisted fields, rejecting inconsistent data.
    pub fn from_parts(
        id: FamilyId,
        owner: Option<UserId>,
        versions: Vec<VersionId>,
        current: VersionId,
        disabled_versions: impl IntoIterator<Item = VersionId>,
        is_family_disabled: bool,
        revision: i64,
    ) -> Result<Self, CoreError> {
        let family = Self {
            id,
            owner,
            versions,
            current,
            disabled_versions: disabled_versions.into_iter().collect(),
            is_family_disabled,
            revision,
        };
        family.check_invariants()?;
        Ok(family)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn is_global(&self) -> bool {
        self.owner.is_none()
    }

    /// All versions in insertion order.
    pub fn versions(&self) -> &[VersionId] {
        &self.versions
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn disabled_versions(&self) -> &BTreeSet<VersionId> {
        &self.disabled_versions
    }

    pub fn is_family_disabled(&self) -> bool {
        self.is_family_disabled
    }

    /// Store revision this snapshot was read at (0 if never persisted).
    pub fn revision(&self) -> i64 {
        self.revision
    }

    pub fn contains(&self, version_id: &str) -> bool {
        self.versions.iter().any(|v| v == version_id)
    }

    pub fn is_version_disabled(&self, version_id: &str) -> bool {
        self.disabled_versions.contains(version_id)
    }

    /// Active versions in insertion order.
    pub fn active_versions(&self) -> impl Iterator<Item = &str> {
        self.versions
            .iter()
            .filter(|v| !self.disabled_versions.contains(*v))
            .map(String::as_str)
    }

    /// 1-based position of `version_id` in the insertion order.
    pub fn version_number(&self, version_id: &str) -> Option<usize> {
        self.versions
            .iter()
            .position(|v| v == version_id)
            .map(|index| index + 1)
    }

    /// The current version has been disabled and not yet replaced.
    pub fn has_disabled_current(&self) -> bool {
        self.disabled_versions.contains(&self.current)
    }

    /// Verify the structural invariants: the current version and every
    /// disabled version are members of the family.
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        if !self.contains(&self.current) {
            return Err(CoreError::Validation(format!(
                "Current version '{}' is not a member of family {}",
                self.current, self.id
            )));
        }
        if let Some(stray) = self.disabled_versions.iter().find(|v| !self.contains(v)) {
            return Err(CoreError::Validation(format!(
                "Disabled version '{stray}' is not a member of family {}",
                self.id
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub(crate) fn apply_insert(&mut self, version_id: &str) -> Result<(), CoreError> {
        validate_version_id(version_id)?;
        if self.contains(version_id) {
            return Err(CoreError::Validation(format!(
                "Version '{version_id}' already belongs to family {}",
                self.id
            )));
        }
        self.versions.push(version_id.to_string());
        self.current = version_id.to_string();
        Ok(())
    }

    pub(crate) fn apply_set_current(&mut self, version_id: &str) -> Result<(), CoreError> {
        self.ensure_member(version_id)?;
        if self.is_version_disabled(version_id) {
            return Err(CoreError::Validation(format!(
                "Disabled version '{version_id}' cannot be set as current"
            )));
        }
        self.current = version_id.to_string();
        Ok(())
    }

    /// Leaves `current` untouched even when it is the version being disabled.
    pub(crate) fn apply_disable_version(&mut self, version_id: &str) -> Result<(), CoreError> {
        self.ensure_member(version_id)?;
        if !self.disabled_versions.insert(version_id.to_string()) {
            return Err(CoreError::Validation(format!(
                "Version '{version_id}' is already disabled"
            )));
        }
        Ok(())
    }

    pub(crate) fn apply_restore_version(&mut self, version_id: &str) -> Result<(), CoreError> {
        if !self.disabled_versions.remove(version_id) {
            return Err(CoreError::Validation(format!(
                "Version '{version_id}' is not disabled in family {}",
                self.id
            )));
        }
        Ok(())
    }

    pub(crate) fn apply_disable_family(&mut self) {
        self.is_family_disabled = true;
    }

    pub(crate) fn apply_restore_family(&mut self) {
        self.is_family_disabled = false;
    }

    pub(crate) fn set_revision(&mut self, revision: i64) {
        self.revision = revision;
    }

    fn ensure_member(&self, version_id: &str) -> Result<(), CoreError> {
        if self.contains(version_id) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Version '{version_id}' does not belong to family {}",
                self.id
            )))
        }
    }
}

impl Lockable for VersionFamily {
    fn lock_id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }
}

fn validate_version_id(version_id: &str) -> Result<(), CoreError> {
    if version_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "Version id must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
