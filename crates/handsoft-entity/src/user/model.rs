//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique, lowercased email address.
    pub email: String,
    /// Unique login name.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Administrative location of the user, if any.
    pub commune_id: Option<i64>,
    /// Main address, possibly shared with other users.
    pub address_id: Option<i64>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user at registration.
///
/// The user row, its contact, the optional main phone and the role links
/// are written together or not at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Normalized email.
    pub email: String,
    /// Normalized username.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Commune the user lives in.
    pub commune_id: i64,
    /// Resolved address.
    pub address_id: i64,
    /// Contact full name; may be empty.
    pub full_name: String,
    /// Main phone number, stored with label `mobile`.
    pub phone: Option<String>,
    /// Role names to link. Missing roles are created on demand.
    pub role_names: Vec<String>,
}
