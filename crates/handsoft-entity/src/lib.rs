//! # handsoft-entity
//!
//! Domain entity models for the Handsoft backend. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod address;
pub mod geo;
pub mod rbac;
pub mod user;
pub mod warehouse;
