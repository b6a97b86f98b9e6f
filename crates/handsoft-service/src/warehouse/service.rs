//! Warehousing use cases.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use handsoft_core::error::AppError;
use handsoft_core::result::AppResult;
use handsoft_database::stores::WarehouseStore;
use handsoft_entity::warehouse::{
    NewRack, NewWarehouse, Space, SpaceFloor, SpaceTree, SpaceType, Warehouse,
    WarehouseCapacity, WarehouseConfigUpdate, WarehouseWithRacks,
};

use crate::context::RequestContext;

/// Data for a space about to be created.
#[derive(Debug, Clone)]
pub struct CreateSpaceInput {
    pub name: String,
    /// Raw type as submitted: `open_area` or `building`.
    pub space_type: String,
    pub description: Option<String>,
    /// Required for open areas, ignored for buildings.
    pub open_area_warehouse: Option<NewWarehouse>,
}

/// A warehouse with its racks and computed capacity.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseDetail {
    pub warehouse: WarehouseWithRacks,
    pub capacity: WarehouseCapacity,
}

/// Manages the space → floor → warehouse → rack hierarchy.
#[derive(Clone)]
pub struct WarehouseService {
    warehouses: Arc<dyn WarehouseStore>,
}

impl std::fmt::Debug for WarehouseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarehouseService").finish_non_exhaustive()
    }
}

impl WarehouseService {
    /// Creates a new warehouse service.
    pub fn new(warehouses: Arc<dyn WarehouseStore>) -> Self {
        Self { warehouses }
    }

    /// Create a space. An open area is created together with its main
    /// warehouse and that warehouse's racks in one transaction.
    pub async fn create_space(&self, ctx: &RequestContext, input: CreateSpaceInput) -> AppResult<Space> {
        let space_type: SpaceType = input
            .space_type
            .trim()
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid space type: '{}'", input.space_type)))?;
        let name = required("Space name", &input.name)?;
        let description = input.description.as_deref().map(str::trim).unwrap_or_default();

        let main_warehouse = match space_type {
            SpaceType::OpenArea => {
                let data = input.open_area_warehouse.ok_or_else(|| {
                    AppError::validation("An open area requires open_area_warehouse")
                })?;
                Some(normalize_warehouse(data)?)
            }
            SpaceType::Building => None,
        };

        let space = self
            .warehouses
            .create_space(name, space_type, description, main_warehouse.as_ref())
            .await?;

        info!(
            user_id = ctx.user_id,
            space_id = space.id,
            space_type = %space.space_type,
            "Space created"
        );
        Ok(space)
    }

    pub async fn list_spaces(&self) -> AppResult<Vec<Space>> {
        self.warehouses.list_spaces().await
    }

    /// A space with its floors, warehouses and racks.
    pub async fn get_space(&self, space_id: i64) -> AppResult<SpaceTree> {
        self.warehouses
            .space_tree(space_id)
            .await?
            .ok_or_else(|| space_not_found(space_id))
    }

    /// Add a floor to a building.
    pub async fn create_floor(
        &self,
        ctx: &RequestContext,
        space_id: i64,
        number: i32,
    ) -> AppResult<SpaceFloor> {
        let space = self
            .warehouses
            .find_space(space_id)
            .await?
            .ok_or_else(|| space_not_found(space_id))?;

        if space.space_type != SpaceType::Building {
            return Err(AppError::validation("Floors can only be added to buildings"));
        }

        let floor = self.warehouses.create_floor(space_id, number).await?;
        info!(user_id = ctx.user_id, space_id, floor_id = floor.id, number, "Floor created");
        Ok(floor)
    }

    /// Create a warehouse on a floor. Racks are configured afterwards
    /// through [`update_config`](Self::update_config).
    pub async fn create_warehouse_in_floor(
        &self,
        ctx: &RequestContext,
        floor_id: i64,
        data: NewWarehouse,
    ) -> AppResult<Warehouse> {
        let data = normalize_warehouse(data)?;
        let floor = self
            .warehouses
            .find_floor(floor_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Floor {floor_id} not found")))?;

        let warehouse = self.warehouses.create_warehouse_in_floor(&floor, &data).await?;
        info!(
            user_id = ctx.user_id,
            floor_id,
            warehouse_id = warehouse.id,
            "Warehouse created"
        );
        Ok(warehouse)
    }

    /// Partially update a warehouse. When the result has racks, the rack
    /// list is replaced by `update.racks`.
    pub async fn update_config(
        &self,
        ctx: &RequestContext,
        warehouse_id: i64,
        mut update: WarehouseConfigUpdate,
    ) -> AppResult<Warehouse> {
        if update.area_m2.is_some_and(|a| a < 0.0) {
            return Err(AppError::validation("area_m2 must not be negative"));
        }
        if update.pallets_floor.is_some_and(|p| p < 0) {
            return Err(AppError::validation("pallets_floor must not be negative"));
        }
        update.racks = normalize_racks(update.racks)?;

        let warehouse = self
            .warehouses
            .update_config(warehouse_id, &update)
            .await?
            .ok_or_else(|| warehouse_not_found(warehouse_id))?;

        info!(
            user_id = ctx.user_id,
            warehouse_id,
            has_racks = warehouse.has_racks,
            "Warehouse configuration updated"
        );
        Ok(warehouse)
    }

    /// A warehouse with its racks and pallet capacity.
    pub async fn get_warehouse(&self, warehouse_id: i64) -> AppResult<WarehouseDetail> {
        let warehouse = self
            .warehouses
            .find_warehouse(warehouse_id)
            .await?
            .ok_or_else(|| warehouse_not_found(warehouse_id))?;
        let capacity = warehouse.capacity();
        Ok(WarehouseDetail { warehouse, capacity })
    }
}

fn required<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value)
}

fn normalize_warehouse(mut data: NewWarehouse) -> AppResult<NewWarehouse> {
    data.name = required("Warehouse name", &data.name)?.to_string();
    if data.area_m2 < 0.0 {
        return Err(AppError::validation("area_m2 must not be negative"));
    }
    if data.pallets_floor < 0 {
        return Err(AppError::validation("pallets_floor must not be negative"));
    }
    data.racks = normalize_racks(data.racks)?;
    Ok(data)
}

fn normalize_racks(racks: Vec<NewRack>) -> AppResult<Vec<NewRack>> {
    racks
        .into_iter()
        .map(|mut rack| {
            rack.label = required("Rack label", &rack.label)?.to_string();
            if rack.levels < 0 || rack.pallets_per_level < 0 || rack.length_m < 0.0 {
                return Err(AppError::validation(format!(
                    "Rack '{}' has negative dimensions",
                    rack.label
                )));
            }
            Ok(rack)
        })
        .collect()
}

fn space_not_found(space_id: i64) -> AppError {
    AppError::not_found(format!("Space {space_id} not found"))
}

fn warehouse_not_found(warehouse_id: i64) -> AppError {
    AppError::not_found(format!("Warehouse {warehouse_id} not found"))
}
