//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use handsoft_entity::address::Address;
use handsoft_entity::geo::{City, Commune, Country, Region};
use handsoft_entity::user::{UserPhone, UserProfile};
use handsoft_service::auth::{LoginOutcome, RegisteredUser};

/// Registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub created: DateTime<Utc>,
    pub address_id: i64,
}

impl From<RegisteredUser> for RegisterResponse {
    fn from(registered: RegisteredUser) -> Self {
        Self {
            id: registered.user.id,
            email: registered.user.email,
            username: registered.user.username,
            created: registered.user.created_at,
            address_id: registered.address_id,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            access_token: outcome.token.token,
            token_type: "Bearer".to_string(),
            expires_in: outcome.token.expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneResponse {
    pub label: String,
    pub number: String,
    pub is_main: bool,
}

impl From<UserPhone> for PhoneResponse {
    fn from(phone: UserPhone) -> Self {
        Self {
            label: phone.label,
            number: phone.number,
            is_main: phone.is_main,
        }
    }
}

/// Location inferred from the address' commune. Every level is null when
/// the user has no address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationResponse {
    pub country: Option<Country>,
    pub region: Option<Region>,
    pub city: Option<City>,
    pub commune: Option<Commune>,
}

/// Profile of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub contact: Option<ContactResponse>,
    pub phones: Vec<PhoneResponse>,
    pub address: Option<Address>,
    pub location: LocationResponse,
    pub roles: Vec<String>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let location = profile
            .location
            .map(|l| LocationResponse {
                country: Some(l.country),
                region: Some(l.region),
                city: Some(l.city),
                commune: Some(l.commune),
            })
            .unwrap_or_default();

        Self {
            id: profile.user.id,
            email: profile.user.email,
            username: profile.user.username,
            is_active: profile.user.is_active,
            contact: profile.contact.map(|c| ContactResponse {
                full_name: c.full_name,
            }),
            phones: profile.phones.into_iter().map(Into::into).collect(),
            address: profile.address,
            location,
            roles: profile.roles,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRolesResponse {
    pub user_id: i64,
    pub roles: Vec<String>,
}

