//! Space type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of physical space.
///
/// An open area holds exactly one warehouse directly; a building holds
/// floors, and floors hold warehouses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceType {
    OpenArea,
    Building,
}

impl SpaceType {
    /// Return the type as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenArea => "open_area",
            Self::Building => "building",
        }
    }
}

impl fmt::Display for SpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpaceType {
    type Err = handsoft_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open_area" => Ok(Self::OpenArea),
            "building" => Ok(Self::Building),
            _ => Err(handsoft_core::AppError::validation(format!(
                "Invalid space type: '{s}'. Expected one of: open_area, building"
            ))),
        }
    }
}

impl TryFrom<String> for SpaceType {
    type Error = handsoft_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
