//! Spaces, floors, warehouses and racks.

pub mod service;

pub use service::{CreateSpaceInput, WarehouseDetail, WarehouseService};
