//! Address repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use handsoft_core::error::{AppError, ErrorKind};
use handsoft_core::result::AppResult;
use handsoft_entity::address::{Address, AddressKey};

use crate::stores::AddressStore;

const SELECT_BY_KEY: &str = "SELECT * FROM addresses \
     WHERE commune_id = $1 AND street = $2 AND street_number = $3 \
     AND is_condominium = $4 AND condominium_house_number = $5 \
     AND building_number = $6 AND apartment_number = $7 AND extra = $8 \
     ORDER BY id LIMIT 1";

/// Repository for shared addresses.
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    /// Create a new address repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressStore for AddressRepository {
    async fn commune_exists(&self, commune_id: i64) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM communes WHERE id = $1)")
            .bind(commune_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check commune", e))
    }

    async fn find_address(&self, key: &AddressKey) -> AppResult<Option<Address>> {
        sqlx::query_as::<_, Address>(SELECT_BY_KEY)
            .bind(key.commune_id)
            .bind(&key.street)
            .bind(&key.street_number)
            .bind(key.is_condominium)
            .bind(&key.condominium_house_number)
            .bind(&key.building_number)
            .bind(&key.apartment_number)
            .bind(&key.extra)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up address", e))
    }

    async fn insert_address(&self, key: &AddressKey) -> AppResult<Address> {
        let inserted = sqlx::query_as::<_, Address>(
            "INSERT INTO addresses (commune_id, street, street_number, is_condominium, \
             condominium_house_number, building_number, apartment_number, extra) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT ON CONSTRAINT addresses_natural_key DO NOTHING \
             RETURNING *",
        )
        .bind(key.commune_id)
        .bind(&key.street)
        .bind(&key.street_number)
        .bind(key.is_condominium)
        .bind(&key.condominium_house_number)
        .bind(&key.building_number)
        .bind(&key.apartment_number)
        .bind(&key.extra)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert address", e))?;

        if let Some(address) = inserted {
            return Ok(address);
        }

        debug!(commune_id = key.commune_id, "Address inserted concurrently, reusing existing row");
        self.find_address(key)
            .await?
            .ok_or_else(|| AppError::internal("Address vanished after insert conflict"))
    }
}
