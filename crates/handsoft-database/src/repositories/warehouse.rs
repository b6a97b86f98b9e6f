//! Warehousing repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use handsoft_core::error::{AppError, ErrorKind};
use handsoft_core::result::AppResult;
use handsoft_entity::warehouse::{
    NewRack, NewWarehouse, Space, SpaceFloor, SpaceTree, SpaceType, Warehouse,
    WarehouseConfigUpdate, WarehouseRack, WarehouseWithRacks,
};

use crate::stores::WarehouseStore;

/// Postgres-backed spaces, floors, warehouses and racks.
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    pool: PgPool,
}

impl WarehouseRepository {
    /// Create a new warehouse repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WarehouseStore for WarehouseRepository {
    /// Create a space. For open areas the main warehouse and its racks are
    /// created in the same transaction.
    async fn create_space(
        &self,
        name: &str,
        space_type: SpaceType,
        description: &str,
        main_warehouse: Option<&NewWarehouse>,
    ) -> AppResult<Space> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let space = sqlx::query_as::<_, Space>(
            "INSERT INTO spaces (name, space_type, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(space_type.as_str())
        .bind(description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create space", e))?;

        if let Some(data) = main_warehouse {
            let warehouse = insert_warehouse(&mut tx, space.id, None, data).await?;
            if data.has_racks {
                insert_racks(&mut tx, warehouse.id, &data.racks).await?;
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit space creation", e)
        })?;

        Ok(space)
    }

    /// List all spaces ordered by id.
    async fn list_spaces(&self) -> AppResult<Vec<Space>> {
        sqlx::query_as::<_, Space>("SELECT * FROM spaces ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list spaces", e))
    }

    /// Find a space by primary key.
    async fn find_space(&self, id: i64) -> AppResult<Option<Space>> {
        sqlx::query_as::<_, Space>("SELECT * FROM spaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find space", e))
    }

    /// Load a space with floors, warehouses and racks.
    async fn space_tree(&self, id: i64) -> AppResult<Option<SpaceTree>> {
        let Some(space) = self.find_space(id).await? else {
            return Ok(None);
        };

        let floors = sqlx::query_as::<_, SpaceFloor>(
            "SELECT * FROM space_floors WHERE space_id = $1 ORDER BY number ASC, id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list floors", e))?;

        let warehouses = sqlx::query_as::<_, Warehouse>(
            "SELECT * FROM warehouses WHERE space_id = $1 ORDER BY id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list warehouses", e))?;

        let racks = sqlx::query_as::<_, WarehouseRack>(
            "SELECT wr.* FROM warehouse_racks wr \
             JOIN warehouses w ON w.id = wr.warehouse_id \
             WHERE w.space_id = $1 ORDER BY wr.id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list racks", e))?;

        Ok(Some(SpaceTree::assemble(space, floors, warehouses, racks)))
    }

    /// Add a floor to a space.
    async fn create_floor(&self, space_id: i64, number: i32) -> AppResult<SpaceFloor> {
        sqlx::query_as::<_, SpaceFloor>(
            "INSERT INTO space_floors (space_id, number) VALUES ($1, $2) RETURNING *",
        )
        .bind(space_id)
        .bind(number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create floor", e))
    }

    /// Find a floor by primary key.
    async fn find_floor(&self, id: i64) -> AppResult<Option<SpaceFloor>> {
        sqlx::query_as::<_, SpaceFloor>("SELECT * FROM space_floors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find floor", e))
    }

    /// Create a warehouse on a floor. Racks are not created here.
    async fn create_warehouse_in_floor(
        &self,
        floor: &SpaceFloor,
        data: &NewWarehouse,
    ) -> AppResult<Warehouse> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        insert_warehouse(&mut conn, floor.space_id, Some(floor.id), data).await
    }

    /// Load a warehouse with its racks.
    async fn find_warehouse(&self, id: i64) -> AppResult<Option<WarehouseWithRacks>> {
        let Some(warehouse) = sqlx::query_as::<_, Warehouse>("SELECT * FROM warehouses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find warehouse", e))?
        else {
            return Ok(None);
        };

        let racks = sqlx::query_as::<_, WarehouseRack>(
            "SELECT * FROM warehouse_racks WHERE warehouse_id = $1 ORDER BY id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list racks", e))?;

        Ok(Some(WarehouseWithRacks { warehouse, racks }))
    }

    /// Apply a configuration update. When the resulting warehouse has racks
    /// the rack list is replaced by `update.racks`. Returns `None` when the
    /// warehouse does not exist.
    async fn update_config(
        &self,
        id: i64,
        update: &WarehouseConfigUpdate,
    ) -> AppResult<Option<Warehouse>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let Some(mut warehouse) = sqlx::query_as::<_, Warehouse>(
            "SELECT * FROM warehouses WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find warehouse", e))?
        else {
            return Ok(None);
        };

        update.apply_to(&mut warehouse);

        let warehouse = sqlx::query_as::<_, Warehouse>(
            "UPDATE warehouses SET area_m2 = $2, pallets_floor = $3, has_racks = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(warehouse.area_m2)
        .bind(warehouse.pallets_floor)
        .bind(warehouse.has_racks)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update warehouse", e))?;

        if warehouse.has_racks {
            sqlx::query("DELETE FROM warehouse_racks WHERE warehouse_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear racks", e))?;
            insert_racks(&mut tx, id, &update.racks).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit warehouse update", e)
        })?;

        Ok(Some(warehouse))
    }
}

async fn insert_warehouse(
    conn: &mut PgConnection,
    space_id: i64,
    floor_id: Option<i64>,
    data: &NewWarehouse,
) -> AppResult<Warehouse> {
    sqlx::query_as::<_, Warehouse>(
        "INSERT INTO warehouses (space_id, floor_id, name, area_m2, pallets_floor, has_racks) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(space_id)
    .bind(floor_id)
    .bind(&data.name)
    .bind(data.area_m2)
    .bind(data.pallets_floor)
    .bind(data.has_racks)
    .fetch_one(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create warehouse", e))
}

async fn insert_racks(conn: &mut PgConnection, warehouse_id: i64, racks: &[NewRack]) -> AppResult<()> {
    for rack in racks {
        sqlx::query(
            "INSERT INTO warehouse_racks (warehouse_id, label, levels, pallets_per_level, length_m) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(warehouse_id)
        .bind(&rack.label)
        .bind(rack.levels)
        .bind(rack.pallets_per_level)
        .bind(rack.length_m)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create rack", e))?;
    }
    Ok(())
}
