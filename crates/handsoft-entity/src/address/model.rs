//! Address entity and its natural key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A real-world address, shared by every user living there.
///
/// Rows are never mutated once created. Absent auxiliary fields are stored
/// as empty strings so two rows with the same [`AddressKey`] compare equal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub id: i64,
    pub commune_id: i64,
    pub street: String,
    /// Free form: `123`, `S/N`, `12-A`.
    pub street_number: String,
    pub is_condominium: bool,
    pub condominium_house_number: String,
    pub building_number: String,
    pub apartment_number: String,
    pub extra: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// The composite key identifying this address.
    pub fn key(&self) -> AddressKey {
        AddressKey {
            commune_id: self.commune_id,
            street: self.street.clone(),
            street_number: self.street_number.clone(),
            is_condominium: self.is_condominium,
            condominium_house_number: self.condominium_house_number.clone(),
            building_number: self.building_number.clone(),
            apartment_number: self.apartment_number.clone(),
            extra: self.extra.clone(),
        }
    }
}

/// The eight fields that make two addresses the same address.
///
/// Text fields are compared with exact, case-sensitive equality; callers
/// normalize whitespace before building a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressKey {
    pub commune_id: i64,
    pub street: String,
    pub street_number: String,
    pub is_condominium: bool,
    pub condominium_house_number: String,
    pub building_number: String,
    pub apartment_number: String,
    pub extra: String,
}
