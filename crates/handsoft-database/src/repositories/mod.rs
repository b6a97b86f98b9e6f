//! Repository implementations for all Handsoft entities.

pub mod address;
pub mod geo;
pub mod permission;
pub mod role;
pub mod user;
pub mod warehouse;

pub use address::AddressRepository;
pub use geo::GeoRepository;
pub use permission::PermissionRepository;
pub use role::RoleRepository;
pub use crate::stores::RoleChanges;
pub use user::UserRepository;
pub use warehouse::WarehouseRepository;
