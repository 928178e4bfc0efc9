//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument.

pub mod object_lock_repo;
pub mod version_family_repo;

pub use object_lock_repo::ObjectLockRepo;
pub use version_family_repo::{FamilyWrite, VersionFamilyRepo};
