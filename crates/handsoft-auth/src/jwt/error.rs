//! Token failure taxonomy.

use thiserror::Error;

use handsoft_core::error::{AppError, ErrorKind};

/// Why a token could not be issued or accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The signature or algorithm does not match the configured key.
    #[error("Invalid token signature")]
    InvalidSignature,
    /// The token lifetime has ended.
    #[error("Token has expired")]
    Expired,
    /// The `iss` claim differs from the configured issuer.
    #[error("Token issuer mismatch")]
    IssuerMismatch,
    /// The token could not be parsed.
    #[error("Malformed token")]
    Malformed,
    /// The signing backend failed.
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AppError::with_source(ErrorKind::Internal, "Token signing failed", err),
            other => AppError::authentication(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_failure_is_system_error() {
        let err: AppError = TokenError::Signing("backend".into()).into();
        assert_eq!(err.kind, ErrorKind::Internal);

        let err: AppError = TokenError::Expired.into();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Token has expired");
    }
}
