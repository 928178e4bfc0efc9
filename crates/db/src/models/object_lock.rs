//! Object lock rows.

use curator_core::lock::LockRecord;
use curator_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `object_locks` table.
#[derive(Debug, Clone, FromRow)]
pub struct ObjectLockRow {
    pub object_id: String,
    pub holder_user_id: String,
    pub acquired_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ObjectLockRow> for LockRecord {
    fn from(row: ObjectLockRow) -> Self {
        LockRecord {
            object_id: row.object_id,
            holder_user_id: row.holder_user_id,
            acquired_at: row.acquired_at,
        }
    }
}
