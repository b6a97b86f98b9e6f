//! Pallet capacity of a warehouse.

use serde::{Deserialize, Serialize};

use super::model::{Warehouse, WarehouseRack};

/// Pallet capacity derived from the floor allowance and the racks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseCapacity {
    pub pallets_floor: i64,
    /// Sum of `levels * pallets_per_level` over every rack.
    pub pallets_racks: i64,
    pub pallets_total: i64,
}

impl WarehouseCapacity {
    pub fn compute(warehouse: &Warehouse, racks: &[WarehouseRack]) -> Self {
        let pallets_floor = i64::from(warehouse.pallets_floor);
        let pallets_racks = racks
            .iter()
            .map(|r| i64::from(r.levels) * i64::from(r.pallets_per_level))
            .sum();

        Self {
            pallets_floor,
            pallets_racks,
            pallets_total: pallets_floor + pallets_racks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rack(levels: i32, per_level: i32) -> WarehouseRack {
        let now = Utc::now();
        WarehouseRack {
            id: 0,
            warehouse_id: 1,
            label: "R".into(),
            levels,
            pallets_per_level: per_level,
            length_m: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_capacity_sums_floor_and_racks() {
        let now = Utc::now();
        let w = Warehouse {
            id: 1,
            space_id: 1,
            floor_id: None,
            name: "A".into(),
            area_m2: 0.0,
            pallets_floor: 12,
            has_racks: true,
            created_at: now,
            updated_at: now,
        };

        let cap = WarehouseCapacity::compute(&w, &[rack(4, 6), rack(3, 2)]);
        assert_eq!(cap.pallets_floor, 12);
        assert_eq!(cap.pallets_racks, 30);
        assert_eq!(cap.pallets_total, 42);
    }
}
