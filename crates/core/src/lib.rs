//! Object locking and version-family management for the curation platform.
//!
//! The two managers share one ownership policy ([`access::AccessGate`]) and
//! talk to persistence only through the [`lock::LockStore`] and
//! [`version_family::VersionFamilyStore`] traits.

pub mod access;
pub mod config;
pub mod error;
pub mod lock;
pub mod memory;
pub mod roles;
pub mod types;
pub mod user;
pub mod version_family;
