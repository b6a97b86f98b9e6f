//! User profile use cases.

pub mod service;

pub use service::UserService;
