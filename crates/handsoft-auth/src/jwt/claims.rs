//! JWT claims structure carried by access tokens.

use serde::{Deserialize, Serialize};

/// Identity claims embedded in every access token.
///
/// The role names are a snapshot taken at sign time. They are trusted for
/// identity only; permissions are always resolved against the current
/// role/permission relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub uid: i64,
    /// Role names held by the user when the token was issued.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issuer.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}
