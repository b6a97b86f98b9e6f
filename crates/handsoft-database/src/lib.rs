//! # handsoft-database
//!
//! PostgreSQL connection management, the store traits consumed by the
//! authentication core and concrete repository implementations for every
//! Handsoft entity.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod stores;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use connection::DatabasePool;
pub use stores::{
    AddressStore, CredentialStore, LoginCandidate, PermissionStore, RbacStore, RoleChanges,
    RoleStore, WarehouseStore,
};
