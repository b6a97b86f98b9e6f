//! Geography entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
    /// ISO-like short code, e.g. `CL`.
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Region {
    pub id: i64,
    pub country_id: i64,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: i64,
    pub region_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Leaf of the geography tree. Every address is anchored to one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Commune {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A commune with its full ancestor chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuneDetail {
    pub commune: Commune,
    pub city: City,
    pub region: Region,
    pub country: Country,
}
