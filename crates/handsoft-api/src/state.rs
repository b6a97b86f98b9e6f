//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use handsoft_auth::jwt::{TokenSigner, TokenVerifier};
use handsoft_auth::password::PasswordHasher;
use handsoft_auth::rbac::RbacResolver;
use handsoft_core::config::AppConfig;
use handsoft_database::repositories::{
    AddressRepository, GeoRepository, PermissionRepository, RoleRepository, UserRepository,
    WarehouseRepository,
};
use handsoft_database::stores::{
    AddressStore, CredentialStore, PermissionStore, RbacStore, RoleStore, WarehouseStore,
};
use handsoft_service::{
    AddressNormalizer, AdminService, AuthService, GeoService, UserService, WarehouseService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// Access token verifier used by the bearer gate
    pub token_verifier: Arc<TokenVerifier>,
    /// Permission and role resolution
    pub rbac: Arc<RbacResolver>,

    // ── Services ─────────────────────────────────────────────
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub geo_service: Arc<GeoService>,
    pub admin_service: Arc<AdminService>,
    pub warehouse_service: Arc<WarehouseService>,
}

/// The stores behind the services. Geography stays on Postgres.
#[derive(Clone)]
pub struct CoreStores {
    pub credentials: Arc<dyn CredentialStore>,
    pub addresses: Arc<dyn AddressStore>,
    pub rbac: Arc<dyn RbacStore>,
    pub roles: Arc<dyn RoleStore>,
    pub permissions: Arc<dyn PermissionStore>,
    pub warehouses: Arc<dyn WarehouseStore>,
}

impl CoreStores {
    /// Postgres-backed stores.
    pub fn postgres(pool: &PgPool) -> Self {
        let roles = Arc::new(RoleRepository::new(pool.clone()));
        Self {
            credentials: Arc::new(UserRepository::new(pool.clone())),
            addresses: Arc::new(AddressRepository::new(pool.clone())),
            rbac: roles.clone(),
            roles,
            permissions: Arc::new(PermissionRepository::new(pool.clone())),
            warehouses: Arc::new(WarehouseRepository::new(pool.clone())),
        }
    }

    /// One store implementing every seam, e.g. the in-memory store.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CredentialStore
            + AddressStore
            + RbacStore
            + RoleStore
            + PermissionStore
            + WarehouseStore
            + 'static,
    {
        Self {
            credentials: store.clone(),
            addresses: store.clone(),
            rbac: store.clone(),
            roles: store.clone(),
            permissions: store.clone(),
            warehouses: store,
        }
    }
}

impl AppState {
    /// Wire every service against Postgres.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let stores = CoreStores::postgres(&db_pool);
        Self::with_stores(config, db_pool, stores)
    }

    /// Wire every service against `stores`; geography reads `db_pool`.
    pub fn with_stores(config: AppConfig, db_pool: PgPool, stores: CoreStores) -> Self {
        let password_hasher = Arc::new(PasswordHasher::new());
        let token_signer = Arc::new(TokenSigner::new(&config.auth));
        let token_verifier = Arc::new(TokenVerifier::new(&config.auth));
        let rbac = Arc::new(RbacResolver::new(Arc::clone(&stores.rbac)));

        let normalizer = Arc::new(AddressNormalizer::new(Arc::clone(&stores.addresses)));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&stores.credentials),
            normalizer,
            password_hasher,
            token_signer,
            &config.auth,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&stores.credentials)));
        let geo_service = Arc::new(GeoService::new(Arc::new(GeoRepository::new(
            db_pool.clone(),
        ))));
        let admin_service = Arc::new(AdminService::new(
            Arc::clone(&stores.roles),
            Arc::clone(&stores.permissions),
            Arc::clone(&stores.credentials),
        ));
        let warehouse_service = Arc::new(WarehouseService::new(Arc::clone(&stores.warehouses)));

        Self {
            config: Arc::new(config),
            db_pool,
            token_verifier,
            rbac,
            auth_service,
            user_service,
            geo_service,
            admin_service,
            warehouse_service,
        }
    }
}
