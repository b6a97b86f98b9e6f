//! Warehousing hierarchy: spaces, floors, warehouses and racks.

pub mod capacity;
pub mod model;
pub mod space_type;

pub use capacity::WarehouseCapacity;
pub use model::{
    FloorTree, NewRack, NewWarehouse, Space, SpaceFloor, SpaceTree, Warehouse,
    WarehouseConfigUpdate, WarehouseRack, WarehouseWithRacks,
};
pub use space_type::SpaceType;
