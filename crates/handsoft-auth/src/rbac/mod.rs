//! Role-based access control.

pub mod resolver;

pub use resolver::{Decision, RbacResolver, module_wildcard};
