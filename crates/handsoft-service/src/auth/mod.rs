//! Registration and login.

pub mod service;

pub use service::{AuthService, LoginOutcome, RegisterInput, RegisteredUser};
