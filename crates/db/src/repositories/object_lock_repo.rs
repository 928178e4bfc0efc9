//! Repository for the `object_locks` table.

use sqlx::PgPool;

use crate::models::object_lock::ObjectLockRow;

/// Column list for `object_locks` queries.
const COLUMNS: &str = "object_id, holder_user_id, acquired_at, created_at, updated_at";

/// Provides CRUD operations for object lock rows.
pub struct ObjectLockRepo;

impl ObjectLockRepo {
    /// Fetch the lock row for an object, stale or not.
    pub async fn find(pool: &PgPool, object_id: &str) -> Result<Option<ObjectLockRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM object_locks WHERE object_id = $1");
        sqlx::query_as::<_, ObjectLockRow>(&query)
            .bind(object_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a lock row, or overwrite the holder and acquisition time of an
    /// existing one.
    pub async fn upsert(
        pool: &PgPool,
        object_id: &str,
        holder_user_id: &str,
        acquired_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<ObjectLockRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO object_locks (object_id, holder_user_id, acquired_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (object_id) DO UPDATE SET \
                 holder_user_id = EXCLUDED.holder_user_id, \
                 acquired_at = EXCLUDED.acquired_at, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ObjectLockRow>(&query)
            .bind(object_id)
            .bind(holder_user_id)
            .bind(acquired_at)
            .fetch_one(pool)
            .await
    }

    /// Delete the lock row for an object. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, object_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM object_locks WHERE object_id = $1")
            .bind(object_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
