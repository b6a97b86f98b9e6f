//! Registration and credential login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use handsoft_auth::jwt::{SignedToken, TokenSigner};
use handsoft_auth::password::{PasswordHasher, PasswordPolicy};
use handsoft_core::config::AuthConfig;
use handsoft_core::error::AppError;
use handsoft_core::result::AppResult;
use handsoft_database::stores::CredentialStore;
use handsoft_entity::user::{NewUser, User};

use crate::address::{AddressInput, AddressNormalizer};

/// Message shared by every credential failure so callers cannot tell an
/// unknown login from a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;

/// Data submitted at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: AddressInput,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user: User,
    pub address_id: i64,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user_id: i64,
    pub token: SignedToken,
}

/// Creates accounts and exchanges credentials for access tokens.
#[derive(Clone)]
pub struct AuthService {
    /// Credential store.
    credentials: Arc<dyn CredentialStore>,
    /// Shared address resolution.
    addresses: Arc<AddressNormalizer>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password length policy.
    policy: PasswordPolicy,
    /// Access token signer.
    signer: Arc<TokenSigner>,
    /// Role given to every new account.
    default_role: String,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("policy", &self.policy)
            .field("default_role", &self.default_role)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        addresses: Arc<AddressNormalizer>,
        hasher: Arc<PasswordHasher>,
        signer: Arc<TokenSigner>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            credentials,
            addresses,
            hasher,
            policy: PasswordPolicy::new(config),
            signer,
            default_role: config.default_role.clone(),
        }
    }

    /// Register a new account.
    ///
    /// The email is trimmed and lowercased; username, phone and full name
    /// are trimmed. Fails with a conflict when the email or username is
    /// taken and with a validation error for an unknown commune.
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegisteredUser> {
        let email = input.email.trim().to_lowercase();
        let username = input.username.trim().to_string();
        let full_name = input.full_name.as_deref().map(str::trim).unwrap_or_default();
        let phone = input
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        let username_len = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&username_len) {
            return Err(AppError::validation(format!(
                "Username must be between {USERNAME_MIN} and {USERNAME_MAX} characters long"
            )));
        }
        self.policy.validate(&input.password)?;

        if self
            .credentials
            .email_or_username_taken(&email, &username)
            .await?
        {
            return Err(AppError::conflict("Email or username already exists"));
        }

        let address = self.addresses.resolve(&input.address).await?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let user = self
            .credentials
            .create_registered(&NewUser {
                email,
                username,
                password_hash,
                commune_id: address.commune_id,
                address_id: address.id,
                full_name: full_name.to_string(),
                phone: phone.map(str::to_string),
                role_names: vec![self.default_role.clone()],
            })
            .await?;

        info!(user_id = user.id, address_id = address.id, "User registered");

        Ok(RegisteredUser {
            user,
            address_id: address.id,
        })
    }

    /// Exchange a login (email or username) and password for a token.
    ///
    /// The login matches `lower(trim(login))` against emails and the raw
    /// login against usernames.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<LoginOutcome> {
        let email = login.trim().to_lowercase();

        let Some(candidate) = self.credentials.find_for_login(&email, login).await? else {
            warn!("Login failed: unknown account");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self
            .hasher
            .verify_password(password, &candidate.user.password_hash)?
        {
            warn!(user_id = candidate.user.id, "Login failed: wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if !candidate.user.is_active {
            warn!(user_id = candidate.user.id, "Login refused: account disabled");
            return Err(AppError::authorization("Account is disabled"));
        }

        let token = self.signer.sign(candidate.user.id, &candidate.roles)?;
        info!(user_id = candidate.user.id, roles = ?candidate.roles, "User logged in");

        Ok(LoginOutcome {
            user_id: candidate.user.id,
            token,
        })
    }
}
