//! Role, permission and user-role administration.

pub mod service;

pub use service::{AdminService, NewRoleInput, PermissionAssignment};
