//! Role and permission entities.

pub mod permission;
pub mod role;

pub use permission::{Permission, PermissionCode};
pub use role::Role;
