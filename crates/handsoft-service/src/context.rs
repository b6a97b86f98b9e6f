//! Request context carrying the authenticated identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the caller of the current request.
///
/// Built from verified token claims by the bearer gate and handed to
/// handlers explicitly. The role names are those embedded in the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: i64,
    /// Role names from the token.
    pub roles: Vec<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: i64, roles: Vec<String>) -> Self {
        Self {
            user_id,
            roles,
            request_time: Utc::now(),
        }
    }

    /// Whether the token carried the given role name.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r == name)
    }
}
