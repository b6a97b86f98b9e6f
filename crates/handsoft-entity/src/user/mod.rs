//! User domain entities.

pub mod contact;
pub mod model;
pub mod profile;

pub use contact::{Contact, UserPhone};
pub use model::{NewUser, User};
pub use profile::{Location, UserProfile};
