//! Repository for the `version_families` table.

use curator_core::version_family::VersionFamily;
use sqlx::PgPool;

use crate::models::version_family::VersionFamilyRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner, versions, current_version, disabled_versions, \
    is_disabled, revision, created_at, updated_at";

/// Full-aggregate write payload. Every save writes all of these together.
#[derive(Debug, Clone)]
pub struct FamilyWrite<'a> {
    pub id: &'a str,
    pub owner: Option<&'a str>,
    pub versions: &'a [String],
    pub current_version: &'a str,
    pub disabled_versions: Vec<String>,
    pub is_disabled: bool,
}

impl<'a> From<&'a VersionFamily> for FamilyWrite<'a> {
    fn from(family: &'a VersionFamily) -> Self {
        Self {
            id: family.id(),
            owner: family.owner(),
            versions: family.versions(),
            current_version: family.current(),
            disabled_versions: family.disabled_versions().iter().cloned().collect(),
            is_disabled: family.is_family_disabled(),
        }
    }
}

/// Provides lookups and whole-row writes for version families.
pub struct VersionFamilyRepo;

impl VersionFamilyRepo {
    // ── Lookups ──────────────────────────────────────────────────────

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<VersionFamilyRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM version_families WHERE id = $1");
        sqlx::query_as::<_, VersionFamilyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the family whose `versions` array contains `version_id`.
    pub async fn find_by_member_version(
        pool: &PgPool,
        version_id: &str,
    ) -> Result<Option<VersionFamilyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM version_families \
             WHERE versions @> ARRAY[$1]::TEXT[] \
             ORDER BY id \
             LIMIT 1"
        );
        sqlx::query_as::<_, VersionFamilyRow>(&query)
            .bind(version_id)
            .fetch_optional(pool)
            .await
    }

    /// List families owned by `owner`, or global families when `owner` is `None`.
    pub async fn find_by_owner(
        pool: &PgPool,
        owner: Option<&str>,
    ) -> Result<Vec<VersionFamilyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM version_families \
             WHERE owner IS NOT DISTINCT FROM $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, VersionFamilyRow>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// List global families plus those owned by anyone not in `excluded_owners`.
    pub async fn find_all_except_owners(
        pool: &PgPool,
        excluded_owners: &[String],
    ) -> Result<Vec<VersionFamilyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM version_families \
             WHERE owner IS NULL OR owner <> ALL($1) \
             ORDER BY id"
        );
        sqlx::query_as::<_, VersionFamilyRow>(&query)
            .bind(excluded_owners)
            .fetch_all(pool)
            .await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Insert or overwrite a family, bumping its revision. Returns the new revision.
    pub async fn upsert(pool: &PgPool, input: &FamilyWrite<'_>) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO version_families \
                 (id, owner, versions, current_version, disabled_versions, is_disabled, revision) \
             VALUES ($1, $2, $3, $4, $5, $6, 1) \
             ON CONFLICT (id) DO UPDATE SET \
                 owner = EXCLUDED.owner, \
                 versions = EXCLUDED.versions, \
                 current_version = EXCLUDED.current_version, \
                 disabled_versions = EXCLUDED.disabled_versions, \
                 is_disabled = EXCLUDED.is_disabled, \
                 revision = version_families.revision + 1, \
                 updated_at = NOW() \
             RETURNING revision",
        )
        .bind(input.id)
        .bind(input.owner)
        .bind(input.versions)
        .bind(input.current_version)
        .bind(&input.disabled_versions)
        .bind(input.is_disabled)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Insert a family that must not exist yet.
    ///
    /// Returns `None` if a row with the same id is already present.
    pub async fn insert_new(
        pool: &PgPool,
        input: &FamilyWrite<'_>,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO version_families \
                 (id, owner, versions, current_version, disabled_versions, is_disabled, revision) \
             VALUES ($1, $2, $3, $4, $5, $6, 1) \
             ON CONFLICT (id) DO NOTHING \
             RETURNING revision",
        )
        .bind(input.id)
        .bind(input.owner)
        .bind(input.versions)
        .bind(input.current_version)
        .bind(&input.disabled_versions)
        .bind(input.is_disabled)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Overwrite a family only if its stored revision equals `expected`.
    ///
    /// Returns the new revision, or `None` if the row is missing or has moved on.
    pub async fn update_if_revision(
        pool: &PgPool,
        input: &FamilyWrite<'_>,
        expected: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE version_families SET \
                 owner = $2, \
                 versions = $3, \
                 current_version = $4, \
                 disabled_versions = $5, \
                 is_disabled = $6, \
                 revision = revision + 1, \
                 updated_at = NOW() \
             WHERE id = $1 AND revision = $7 \
             RETURNING revision",
        )
        .bind(input.id)
        .bind(input.owner)
        .bind(input.versions)
        .bind(input.current_version)
        .bind(&input.disabled_versions)
        .bind(input.is_disabled)
        .bind(expected)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }
}
