//! # handsoft-service
//!
//! Business logic service layer for Handsoft. Each service orchestrates
//! stores, repositories and the auth primitives to implement one group of
//! use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod address;
pub mod admin;
pub mod auth;
pub mod context;
pub mod geo;
pub mod user;
pub mod warehouse;

pub use address::{AddressError, AddressInput, AddressNormalizer};
pub use admin::AdminService;
pub use auth::AuthService;
pub use context::RequestContext;
pub use geo::GeoService;
pub use user::UserService;
pub use warehouse::WarehouseService;
