//! The error type shared by every Handsoft crate.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxedSource = Box<dyn StdError + Send + Sync>;

/// Coarse classification. The HTTP layer picks status codes from this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    /// Missing API key, bad credentials or an unusable token.
    Authentication,
    /// Identity established, rights missing.
    Authorization,
    Validation,
    /// Unique key already taken.
    Conflict,
    Internal,
    Database,
    Configuration,
    Serialization,
}

impl ErrorKind {
    /// Stable upper-case label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
        }
    }

    /// True for faults on our side; their details never reach clients.
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            Self::Internal | Self::Database | Self::Configuration | Self::Serialization
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind plus a message fit for the caller, optionally wrapping a cause.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<BoxedSource>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Keep `source` for logs while `message` stays caller-facing.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

/// The cause is dropped; boxed errors are not `Clone`.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let message = format!("Malformed JSON: {err}");
        Self::with_source(ErrorKind::Serialization, message, err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        let message = format!("Invalid configuration: {err}");
        Self::with_source(ErrorKind::Configuration, message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_kinds() {
        assert!(ErrorKind::Database.is_system());
        assert!(ErrorKind::Internal.is_system());
        assert!(!ErrorKind::Authorization.is_system());
        assert!(!ErrorKind::Validation.is_system());
    }

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::conflict("Username 'ana' already exists");
        assert_eq!(err.to_string(), "CONFLICT: Username 'ana' already exists");
        assert_eq!(ErrorKind::NotFound.to_string(), ErrorKind::NotFound.as_str());
    }

    #[test]
    fn test_clone_drops_source() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(cause);
        assert!(err.source().is_some());

        let copy = err.clone();
        assert_eq!(copy.kind, ErrorKind::Serialization);
        assert_eq!(copy.message, err.message);
        assert!(copy.source().is_none());
    }
}
