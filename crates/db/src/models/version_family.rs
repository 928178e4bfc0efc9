//! Version family rows.

use curator_core::error::CoreError;
use curator_core::types::Timestamp;
use curator_core::version_family::VersionFamily;
use sqlx::FromRow;

/// A row from the `version_families` table.
#[derive(Debug, Clone, FromRow)]
pub struct VersionFamilyRow {
    pub id: String,
    pub owner: Option<String>,
    pub versions: Vec<String>,
    pub current_version: String,
    pub disabled_versions: Vec<String>,
    pub is_disabled: bool,
    pub revision: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<VersionFamilyRow> for VersionFamily {
    type Error = CoreError;

    fn try_from(row: VersionFamilyRow) -> Result<Self, Self::Error> {
        VersionFamily::from_parts(
            row.id,
            row.owner,
            row.versions,
            row.current_version,
            row.disabled_versions,
            row.is_disabled,
            row.revision,
        )
    }
}
