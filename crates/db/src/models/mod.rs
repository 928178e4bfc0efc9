//! Row structs for the curation tables.
//!
//! Each submodule contains a `FromRow` struct matching the database row and
//! the conversion into the corresponding `curator_core` domain type.

pub mod object_lock;
pub mod version_family;
