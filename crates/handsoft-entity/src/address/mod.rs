//! Shared postal addresses.

pub mod model;

pub use model::{Address, AddressKey};
