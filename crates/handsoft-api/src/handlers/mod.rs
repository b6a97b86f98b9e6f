//! Route handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod geo;
pub mod user;
pub mod warehouse;
