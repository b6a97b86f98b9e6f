//! Address resolution against the geography tree.

pub mod normalizer;

pub use normalizer::{AddressError, AddressInput, AddressNormalizer};
