//! Geography lookups.

pub mod service;

pub use service::GeoService;
