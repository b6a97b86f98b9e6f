//! Aggregated read model returned by the profile endpoint.

use serde::{Deserialize, Serialize};

use super::contact::{Contact, UserPhone};
use super::model::User;
use crate::address::Address;
use crate::geo::{City, Commune, CommuneDetail, Country, Region};

/// Geography chain inferred from a commune.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub country: Country,
    pub region: Region,
    pub city: City,
    pub commune: Commune,
}

impl From<CommuneDetail> for Location {
    fn from(detail: CommuneDetail) -> Self {
        Self {
            country: detail.country,
            region: detail.region,
            city: detail.city,
            commune: detail.commune,
        }
    }
}

/// A user together with everything it owns or references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: User,
    pub contact: Option<Contact>,
    pub phones: Vec<UserPhone>,
    pub address: Option<Address>,
    pub location: Option<Location>,
    pub roles: Vec<String>,
}
