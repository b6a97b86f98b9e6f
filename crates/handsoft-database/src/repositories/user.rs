//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use handsoft_core::error::{AppError, ErrorKind};
use handsoft_core::result::AppResult;
use handsoft_entity::address::Address;
use handsoft_entity::user::contact::MOBILE_LABEL;
use handsoft_entity::user::{Contact, NewUser, User, UserPhone, UserProfile};

use super::geo::GeoRepository;
use crate::stores::{CredentialStore, LoginCandidate};

/// Repository for users, their contact sub-records and role links.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Role names currently assigned to a user, sorted by name.
    pub async fn role_names(&self, user_id: i64) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user roles", e))
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn email_or_username_taken(&self, email: &str, username: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)",
        )
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check user uniqueness", e)
        })
    }

    async fn find_for_login(
        &self,
        email: &str,
        username: &str,
    ) -> AppResult<Option<LoginCandidate>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 OR username = $2 \
             ORDER BY (email = $1) DESC LIMIT 1",
        )
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user for login", e))?;

        let Some(user) = user else {
            return Ok(None);
        };
        let roles = self.role_names(user.id).await?;
        Ok(Some(LoginCandidate { user, roles }))
    }

    async fn create_registered(&self, data: &NewUser) -> AppResult<User> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for name in &data.role_names {
            sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to ensure role", e)
                })?;
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, username, password_hash, commune_id, address_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(data.commune_id)
        .bind(data.address_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("users_username_key") =>
            {
                AppError::conflict(format!("Username '{}' already exists", data.username))
            }
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict(format!("Email '{}' already exists", data.email))
            }
            other => AppError::with_source(ErrorKind::Database, "Failed to create user", other),
        })?;

        sqlx::query("INSERT INTO contacts (user_id, full_name) VALUES ($1, $2)")
            .bind(user.id)
            .bind(&data.full_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create contact", e))?;

        if let Some(phone) = data.phone.as_deref().filter(|p| !p.is_empty()) {
            sqlx::query(
                "INSERT INTO user_phones (user_id, label, number, is_main) VALUES ($1, $2, $3, TRUE)",
            )
            .bind(user.id)
            .bind(MOBILE_LABEL)
            .bind(phone)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create phone", e))?;
        }

        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) \
             SELECT $1, id FROM roles WHERE name = ANY($2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user.id)
        .bind(&data.role_names)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to assign roles", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit registration", e)
        })?;

        Ok(user)
    }

    async fn find_profile(&self, user_id: i64) -> AppResult<Option<UserProfile>> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load contact", e))?;

        let phones = sqlx::query_as::<_, UserPhone>(
            "SELECT * FROM user_phones WHERE user_id = $1 ORDER BY is_main DESC, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load phones", e))?;

        let address = match user.address_id {
            Some(address_id) => sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1")
                .bind(address_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load address", e)
                })?,
            None => None,
        };

        let location = match &address {
            Some(a) => GeoRepository::new(self.pool.clone())
                .commune_detail(a.commune_id)
                .await?
                .map(Into::into),
            None => None,
        };

        let roles = self.role_names(user_id).await?;

        Ok(Some(UserProfile {
            user,
            contact,
            phones,
            address,
            location,
            roles,
        }))
    }

    async fn replace_roles(&self, user_id: i64, role_names: &[String]) -> AppResult<Vec<String>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))?;
        if !exists {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        let found: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM roles WHERE name = ANY($1) ORDER BY name")
                .bind(role_names)
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to resolve roles", e)
                })?;

        if let Some(missing) = role_names
            .iter()
            .find(|name| !found.iter().any(|(_, n)| n == *name))
        {
            return Err(AppError::validation(format!("Unknown role: '{missing}'")));
        }

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear user roles", e))?;

        let role_ids: Vec<i64> = found.iter().map(|(id, _)| *id).collect();
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(user_id)
        .bind(&role_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to assign roles", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit role replacement", e)
        })?;

        Ok(found.into_iter().map(|(_, name)| name).collect())
    }
}
