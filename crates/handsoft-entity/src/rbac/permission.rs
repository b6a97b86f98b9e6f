//! Permission entity model and code parsing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A grantable permission identified by a unique `module:action` code.
///
/// `module:*` codes are stored like any other permission and must be
/// granted explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    pub id: i64,
    pub code: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated permission code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionCode {
    module: String,
    action: String,
}

impl PermissionCode {
    /// Wildcard action granting every action of a module.
    pub const WILDCARD: &'static str = "*";

    /// Module part of the code.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Whether this code is a `module:*` grant.
    pub fn is_wildcard(&self) -> bool {
        self.action == Self::WILDCARD
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.action)
    }
}

impl FromStr for PermissionCode {
    type Err = handsoft_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            handsoft_core::AppError::validation(format!(
                "Invalid permission code: '{s}'. Expected 'module:action' or 'module:*'"
            ))
        };

        let (module, action) = s.split_once(':').ok_or_else(invalid)?;
        if module.is_empty() || action.is_empty() || action.contains(':') {
            return Err(invalid());
        }
        if module.chars().any(char::is_whitespace) || action.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(Self {
            module: module.to_string(),
            action: action.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_codes() {
        let code: PermissionCode = "warehouse:create".parse().unwrap();
        assert_eq!(code.module(), "warehouse");
        assert_eq!(code.to_string(), "warehouse:create");
        assert!(!code.is_wildcard());

        let wildcard: PermissionCode = "warehouse:*".parse().unwrap();
        assert!(wildcard.is_wildcard());
        assert_eq!(wildcard.to_string(), "warehouse:*");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["warehouse", ":create", "warehouse:", "a:b:c", "ware house:read"] {
            assert!(raw.parse::<PermissionCode>().is_err(), "{raw} should be rejected");
        }
    }
}
