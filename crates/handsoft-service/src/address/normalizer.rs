//! Resolves submitted addresses to shared address rows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use handsoft_core::error::AppError;
use handsoft_core::result::AppResult;
use handsoft_database::stores::AddressStore;
use handsoft_entity::address::{Address, AddressKey};

/// Why a submitted address cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The commune does not exist in the geography tree.
    #[error("Unknown commune: {0}")]
    UnknownCommune(i64),
    /// A required text field is empty after trimming.
    #[error("Address field '{0}' is required")]
    MissingField(&'static str),
}

impl From<AddressError> for AppError {
    fn from(err: AddressError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// An address as submitted by a client. Optional fields count as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressInput {
    pub commune_id: i64,
    pub street: String,
    pub street_number: String,
    #[serde(default)]
    pub is_condominium: bool,
    pub condominium_house_number: Option<String>,
    pub building_number: Option<String>,
    pub apartment_number: Option<String>,
    pub extra: Option<String>,
}

impl AddressInput {
    /// Trim every text field and map absent fields to the empty string.
    pub fn normalize(&self) -> AddressKey {
        fn clean(value: &Option<String>) -> String {
            value.as_deref().map(str::trim).unwrap_or_default().to_string()
        }

        AddressKey {
            commune_id: self.commune_id,
            street: self.street.trim().to_string(),
            street_number: self.street_number.trim().to_string(),
            is_condominium: self.is_condominium,
            condominium_house_number: clean(&self.condominium_house_number),
            building_number: clean(&self.building_number),
            apartment_number: clean(&self.apartment_number),
            extra: clean(&self.extra),
        }
    }
}

/// Finds the shared address row for a submitted address, creating it on
/// first use.
///
/// Matching is exact and case-sensitive after whitespace trimming. Existing
/// rows are returned unchanged.
#[derive(Clone)]
pub struct AddressNormalizer {
    store: Arc<dyn AddressStore>,
}

impl std::fmt::Debug for AddressNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressNormalizer").finish_non_exhaustive()
    }
}

impl AddressNormalizer {
    /// Creates a normalizer over the given store.
    pub fn new(store: Arc<dyn AddressStore>) -> Self {
        Self { store }
    }

    /// Resolve `input` to an existing or newly created address.
    pub async fn resolve(&self, input: &AddressInput) -> AppResult<Address> {
        let key = input.normalize();

        if key.street.is_empty() {
            return Err(AddressError::MissingField("street").into());
        }
        if key.street_number.is_empty() {
            return Err(AddressError::MissingField("street_number").into());
        }

        if !self.store.commune_exists(key.commune_id).await? {
            return Err(AddressError::UnknownCommune(key.commune_id).into());
        }

        if let Some(existing) = self.store.find_address(&key).await? {
            debug!(address_id = existing.id, "Reusing existing address");
            return Ok(existing);
        }

        let address = self.store.insert_address(&key).await?;
        info!(address_id = address.id, commune_id = key.commune_id, "Address created");
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsoft_core::error::ErrorKind;
    use handsoft_database::memory::MemoryStore;

    fn input(commune_id: i64) -> AddressInput {
        AddressInput {
            commune_id,
            street: "Main".into(),
            street_number: "100".into(),
            ..Default::default()
        }
    }

    async fn setup() -> (Arc<MemoryStore>, AddressNormalizer, i64) {
        let store = Arc::new(MemoryStore::new());
        let commune = store.add_commune("Providencia").await;
        let normalizer = AddressNormalizer::new(store.clone());
        (store, normalizer, commune)
    }

    #[tokio::test]
    async fn test_identical_input_resolves_to_same_row() {
        let (store, normalizer, commune) = setup().await;

        let first = normalizer.resolve(&input(commune)).await.unwrap();
        let second = normalizer.resolve(&input(commune)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.address_count().await, 1);
    }

    #[tokio::test]
    async fn test_whitespace_and_absent_fields_are_equivalent() {
        let (store, normalizer, commune) = setup().await;
        let first = normalizer.resolve(&input(commune)).await.unwrap();

        let padded = AddressInput {
            street: "  Main ".into(),
            street_number: "100 ".into(),
            building_number: Some("   ".into()),
            extra: Some(String::new()),
            ..input(commune)
        };
        let second = normalizer.resolve(&padded).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.street, "Main");
        assert_eq!(store.address_count().await, 1);
    }

    #[tokio::test]
    async fn test_case_differences_create_distinct_rows() {
        let (store, normalizer, commune) = setup().await;
        let first = normalizer.resolve(&input(commune)).await.unwrap();

        let shouted = AddressInput {
            street: "MAIN".into(),
            ..input(commune)
        };
        let second = normalizer.resolve(&shouted).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.address_count().await, 2);
    }

    #[tokio::test]
    async fn test_any_key_field_distinguishes_addresses() {
        let (_, normalizer, commune) = setup().await;
        let base = normalizer.resolve(&input(commune)).await.unwrap();

        let variants = [
            AddressInput { is_condominium: true, ..input(commune) },
            AddressInput { condominium_house_number: Some("7".into()), ..input(commune) },
            AddressInput { building_number: Some("B".into()), ..input(commune) },
            AddressInput { apartment_number: Some("303".into()), ..input(commune) },
            AddressInput { extra: Some("back door".into()), ..input(commune) },
        ];
        for variant in &variants {
            let other = normalizer.resolve(variant).await.unwrap();
            assert_ne!(other.id, base.id, "{variant:?}");
        }
    }

    #[tokio::test]
    async fn test_unknown_commune_is_rejected() {
        let (store, normalizer, _) = setup().await;

        let err = normalizer.resolve(&input(9999)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("9999"));
        assert_eq!(store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_blank_street_is_rejected() {
        let (_, normalizer, commune) = setup().await;
        let blank = AddressInput {
            street: "   ".into(),
            ..input(commune)
        };

        let err = normalizer.resolve(&blank).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
