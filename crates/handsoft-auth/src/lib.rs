//! # handsoft-auth
//!
//! Credential hashing, bearer-token signing and verification, and role-based
//! access control for the Handsoft backend.
//!
//! ## Modules
//!
//! - `jwt` — HS256 token signing and verification
//! - `password` — Argon2id password hashing and length policy
//! - `rbac` — permission resolution with super-admin bypass and module wildcards

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, SignedToken, TokenError, TokenSigner, TokenVerifier};
pub use password::{PasswordHasher, PasswordPolicy};
pub use rbac::{Decision, RbacResolver};
