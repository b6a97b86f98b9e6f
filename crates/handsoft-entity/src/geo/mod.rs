//! Geography tree: country, region, city, commune.

pub mod model;

pub use model::{City, Commune, CommuneDetail, Country, Region};

/// Code of the country whose regions are listed by default.
pub const DEFAULT_COUNTRY_CODE: &str = "CL";
