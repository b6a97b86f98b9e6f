//! Warehousing entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::capacity::WarehouseCapacity;
use super::space_type::SpaceType;

/// A physical space: an open area or a building.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Space {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub space_type: SpaceType,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A numbered floor of a building space.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpaceFloor {
    pub id: i64,
    pub space_id: i64,
    pub number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A storage area inside a space. `floor_id` is set only for warehouses of
/// building spaces.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Warehouse {
    pub id: i64,
    pub space_id: i64,
    pub floor_id: Option<i64>,
    pub name: String,
    pub area_m2: f64,
    /// Pallets stored directly on the floor.
    pub pallets_floor: i32,
    pub has_racks: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rack with a free-form label.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WarehouseRack {
    pub id: i64,
    pub warehouse_id: i64,
    pub label: String,
    pub levels: i32,
    pub pallets_per_level: i32,
    pub length_m: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a warehouse about to be created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWarehouse {
    pub name: String,
    pub area_m2: f64,
    pub pallets_floor: i32,
    pub has_racks: bool,
    /// Ignored unless `has_racks` is set.
    pub racks: Vec<NewRack>,
}

/// Data for a rack about to be created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRack {
    pub label: String,
    pub levels: i32,
    pub pallets_per_level: i32,
    pub length_m: f64,
}

/// Partial update of a warehouse configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehouseConfigUpdate {
    pub area_m2: Option<f64>,
    pub pallets_floor: Option<i32>,
    pub has_racks: Option<bool>,
    /// Replaces every rack when the resulting `has_racks` is true.
    pub racks: Vec<NewRack>,
}

impl WarehouseConfigUpdate {
    /// Apply the present fields to `warehouse`.
    pub fn apply_to(&self, warehouse: &mut Warehouse) {
        if let Some(area) = self.area_m2 {
            warehouse.area_m2 = area;
        }
        if let Some(pallets) = self.pallets_floor {
            warehouse.pallets_floor = pallets;
        }
        if let Some(has_racks) = self.has_racks {
            warehouse.has_racks = has_racks;
        }
    }
}

/// A warehouse with its racks and computed capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseWithRacks {
    #[serde(flatten)]
    pub warehouse: Warehouse,
    pub racks: Vec<WarehouseRack>,
}

impl WarehouseWithRacks {
    pub fn capacity(&self) -> WarehouseCapacity {
        WarehouseCapacity::compute(&self.warehouse, &self.racks)
    }
}

/// A floor with its warehouses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorTree {
    #[serde(flatten)]
    pub floor: SpaceFloor,
    pub warehouses: Vec<WarehouseWithRacks>,
}

/// A space with its whole nested hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceTree {
    #[serde(flatten)]
    pub space: Space,
    pub floors: Vec<FloorTree>,
    /// Warehouses attached directly to the space (open areas).
    pub warehouses: Vec<WarehouseWithRacks>,
}

impl SpaceTree {
    /// Group the flat rows of one space into its hierarchy. Input order is
    /// kept at every level; warehouses without a matching floor stay at the
    /// space level.
    pub fn assemble(
        space: Space,
        floors: Vec<SpaceFloor>,
        warehouses: Vec<Warehouse>,
        mut racks: Vec<WarehouseRack>,
    ) -> Self {
        let mut loose: Vec<WarehouseWithRacks> = warehouses
            .into_iter()
            .map(|warehouse| {
                let (own, rest): (Vec<_>, Vec<_>) = racks
                    .drain(..)
                    .partition(|r| r.warehouse_id == warehouse.id);
                racks = rest;
                WarehouseWithRacks {
                    warehouse,
                    racks: own,
                }
            })
            .collect();

        let floors = floors
            .into_iter()
            .map(|floor| {
                let (own, rest): (Vec<_>, Vec<_>) = loose
                    .drain(..)
                    .partition(|w| w.warehouse.floor_id == Some(floor.id));
                loose = rest;
                FloorTree {
                    floor,
                    warehouses: own,
                }
            })
            .collect();

        Self {
            space,
            floors,
            warehouses: loose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warehouse() -> Warehouse {
        let now = Utc::now();
        Warehouse {
            id: 1,
            space_id: 1,
            floor_id: None,
            name: "Main".into(),
            area_m2: 100.0,
            pallets_floor: 10,
            has_racks: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn placed(id: i64, floor_id: Option<i64>) -> Warehouse {
        Warehouse {
            id,
            floor_id,
            name: format!("W{id}"),
            has_racks: true,
            ..warehouse()
        }
    }

    fn floor(id: i64, number: i32) -> SpaceFloor {
        let now = Utc::now();
        SpaceFloor {
            id,
            space_id: 1,
            number,
            created_at: now,
            updated_at: now,
        }
    }

    fn rack(id: i64, warehouse_id: i64) -> WarehouseRack {
        let now = Utc::now();
        WarehouseRack {
            id,
            warehouse_id,
            label: format!("R{id}"),
            levels: 1,
            pallets_per_level: 1,
            length_m: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn plant() -> Space {
        let now = Utc::now();
        Space {
            id: 1,
            name: "Plant".into(),
            space_type: SpaceType::Building,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assemble_nests_rows() {
        let tree = SpaceTree::assemble(
            plant(),
            vec![floor(10, 1), floor(11, 2)],
            vec![placed(100, Some(10)), placed(101, Some(11)), placed(102, None)],
            vec![rack(1, 100), rack(2, 101), rack(3, 100)],
        );

        assert_eq!(tree.floors.len(), 2);
        assert_eq!(tree.floors[0].warehouses.len(), 1);
        assert_eq!(tree.floors[0].warehouses[0].racks.len(), 2);
        assert_eq!(tree.floors[1].warehouses[0].warehouse.id, 101);
        assert_eq!(tree.warehouses.len(), 1);
        assert_eq!(tree.warehouses[0].warehouse.id, 102);
        assert!(tree.warehouses[0].racks.is_empty());
    }

    #[test]
    fn test_config_update_is_partial() {
        let mut w = warehouse();
        let update = WarehouseConfigUpdate {
            pallets_floor: Some(25),
            ..Default::default()
        };
        update.apply_to(&mut w);

        assert_eq!(w.pallets_floor, 25);
        assert_eq!(w.area_m2, 100.0);
        assert!(!w.has_racks);
    }

    #[test]
    fn test_space_serializes_type_field() {
        let now = Utc::now();
        let space = Space {
            id: 3,
            name: "Yard".into(),
            space_type: SpaceType::OpenArea,
            description: String::new(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&space).unwrap();
        assert_eq!(json["type"], "open_area");
    }
}
