//! Contact sub-records owned by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Label used for the phone captured at registration.
pub const MOBILE_LABEL: &str = "mobile";

/// One-to-one contact details of a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A phone number owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPhone {
    pub id: i64,
    pub user_id: i64,
    /// Free label: `mobile`, `work`, `home`.
    pub label: String,
    pub number: String,
    /// Whether this is the user's main number.
    pub is_main: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
