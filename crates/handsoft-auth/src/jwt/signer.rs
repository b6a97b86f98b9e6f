//! Access token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use handsoft_core::config::AuthConfig;

use super::claims::Claims;
use super::error::TokenError;

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct SignedToken {
    /// Encoded JWT.
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// The claims that were signed.
    pub claims: Claims,
}

/// Signs HS256 access tokens.
#[derive(Clone)]
pub struct TokenSigner {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Value of the `iss` claim.
    issuer: String,
    /// Token lifetime.
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    /// Creates a new signer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            ttl: Duration::minutes(config.access_ttl_minutes as i64),
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Signs a token for `user_id` carrying `roles`, issued now.
    pub fn sign(&self, user_id: i64, roles: &[String]) -> Result<SignedToken, TokenError> {
        self.sign_at(user_id, roles, Utc::now())
    }

    /// Signs a token with an explicit issue time.
    pub fn sign_at(
        &self,
        user_id: i64,
        roles: &[String],
        issued_at: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let claims = Claims {
            uid: user_id,
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(SignedToken {
            token,
            expires_in: self.ttl_seconds(),
            claims,
        })
    }
}
