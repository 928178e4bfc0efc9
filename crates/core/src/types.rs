/// Opaque identifier of an authenticated (or anonymous) user.
pub type UserId = String;

/// Opaque identifier of a lockable object (a document, a template, ...).
pub type ObjectId = String;

/// Identifier of a version family aggregate.
pub type FamilyId = String;

/// Identifier of a single template version inside a family.
pub type VersionId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
