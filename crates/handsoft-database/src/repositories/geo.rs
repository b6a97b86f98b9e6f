//! Geography repository implementation.

use sqlx::PgPool;

use handsoft_core::error::{AppError, ErrorKind};
use handsoft_core::result::AppResult;
use handsoft_entity::geo::{City, Commune, CommuneDetail, Country, Region};

/// Read access to the country > region > city > commune tree, plus the
/// seeding helpers used by the CLI.
#[derive(Debug, Clone)]
pub struct GeoRepository {
    pool: PgPool,
}

impl GeoRepository {
    /// Create a new geography repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Regions of the country with the given code, ordered by name.
    pub async fn regions_of_country(&self, country_code: &str) -> AppResult<Vec<Region>> {
        sqlx::query_as::<_, Region>(
            "SELECT r.* FROM regions r \
             JOIN countries c ON c.id = r.country_id \
             WHERE c.code = $1 ORDER BY r.name ASC",
        )
        .bind(country_code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list regions", e))
    }

    /// Cities of a region, ordered by name.
    pub async fn cities_of_region(&self, region_id: i64) -> AppResult<Vec<City>> {
        sqlx::query_as::<_, City>("SELECT * FROM cities WHERE region_id = $1 ORDER BY name ASC")
            .bind(region_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list cities", e))
    }

    /// Communes of a city, ordered by name.
    pub async fn communes_of_city(&self, city_id: i64) -> AppResult<Vec<Commune>> {
        sqlx::query_as::<_, Commune>("SELECT * FROM communes WHERE city_id = $1 ORDER BY name ASC")
            .bind(city_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list communes", e))
    }

    /// Case-insensitive substring search over commune names.
    pub async fn search_communes(&self, term: &str, limit: i64) -> AppResult<Vec<Commune>> {
        let pattern = format!("%{}%", escape_like(term));
        sqlx::query_as::<_, Commune>(
            "SELECT * FROM communes WHERE name ILIKE $1 ESCAPE '\\' ORDER BY name ASC LIMIT $2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search communes", e))
    }

    /// A commune together with its city, region and country.
    pub async fn commune_detail(&self, commune_id: i64) -> AppResult<Option<CommuneDetail>> {
        let Some(commune) = sqlx::query_as::<_, Commune>("SELECT * FROM communes WHERE id = $1")
            .bind(commune_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load commune", e))?
        else {
            return Ok(None);
        };

        let city = sqlx::query_as::<_, City>("SELECT * FROM cities WHERE id = $1")
            .bind(commune.city_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load city", e))?;

        let region = sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE id = $1")
            .bind(city.region_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load region", e))?;

        let country = sqlx::query_as::<_, Country>("SELECT * FROM countries WHERE id = $1")
            .bind(region.country_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load country", e))?;

        Ok(Some(CommuneDetail {
            commune,
            city,
            region,
            country,
        }))
    }

    /// Insert a country unless one with the same code exists. Returns the
    /// stored row either way.
    pub async fn ensure_country(&self, name: &str, code: &str) -> AppResult<Country> {
        sqlx::query(
            "INSERT INTO countries (name, code) VALUES ($1, $2) ON CONFLICT (code) DO NOTHING",
        )
        .bind(name)
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to seed country", e))?;

        sqlx::query_as::<_, Country>("SELECT * FROM countries WHERE code = $1")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load country", e))
    }
}

/// Escape `%`, `_` and the escape character itself for use in a LIKE pattern.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("San Pedro"), "San Pedro");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
