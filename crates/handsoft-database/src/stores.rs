//! Persistence seams used by the services.
//!
//! The Postgres repositories implement these traits for production; the
//! `memory` feature provides an in-process implementation for tests.
//! Every method documented as atomic either applies all of its writes or
//! none of them.

use async_trait::async_trait;

use handsoft_core::result::AppResult;
use handsoft_entity::address::{Address, AddressKey};
use handsoft_entity::rbac::{Permission, Role};
use handsoft_entity::user::{NewUser, User, UserProfile};
use handsoft_entity::warehouse::{
    NewWarehouse, Space, SpaceFloor, SpaceTree, SpaceType, Warehouse, WarehouseConfigUpdate,
    WarehouseWithRacks,
};

/// Fields of a role update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_super_admin: Option<bool>,
}

/// A user matched by a login string, with the names of its current roles.
#[derive(Debug, Clone)]
pub struct LoginCandidate {
    pub user: User,
    pub roles: Vec<String>,
}

/// Persists users, their credentials and their role assignments.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Whether any user already uses `email` or `username`.
    async fn email_or_username_taken(&self, email: &str, username: &str) -> AppResult<bool>;

    /// Find a user whose email equals `email` or whose username equals
    /// `username`. An email match wins over a username match.
    async fn find_for_login(&self, email: &str, username: &str)
        -> AppResult<Option<LoginCandidate>>;

    /// Create a registered user with its contact, optional main phone and
    /// roles in one atomic write. Missing roles are created.
    async fn create_registered(&self, data: &NewUser) -> AppResult<User>;

    /// Load a user with everything it owns or references.
    async fn find_profile(&self, user_id: i64) -> AppResult<Option<UserProfile>>;

    /// Replace the user's role set atomically and return the new role names.
    ///
    /// Fails with not-found when the user is absent and with a validation
    /// error naming the first unknown role.
    async fn replace_roles(&self, user_id: i64, role_names: &[String]) -> AppResult<Vec<String>>;
}

/// Persists shared addresses anchored to the geography tree.
#[async_trait]
pub trait AddressStore: Send + Sync + 'static {
    /// Whether the commune exists.
    async fn commune_exists(&self, commune_id: i64) -> AppResult<bool>;

    /// Find the address with exactly this composite key.
    async fn find_address(&self, key: &AddressKey) -> AppResult<Option<Address>>;

    /// Insert an address for `key`, or return the row another writer
    /// inserted for the same key in the meantime.
    async fn insert_address(&self, key: &AddressKey) -> AppResult<Address>;
}

/// Read-only view of the role/permission relation.
///
/// Every call reflects the current database state; nothing is cached.
#[async_trait]
pub trait RbacStore: Send + Sync + 'static {
    /// Whether any of the named roles carries the super-admin flag.
    async fn any_super_admin(&self, role_names: &[String]) -> AppResult<bool>;

    /// Whether any of the named roles is linked to a permission whose code
    /// equals `code` exactly.
    async fn any_grants(&self, role_names: &[String], code: &str) -> AppResult<bool>;
}

/// Role administration and the role side of the role/permission relation.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// All roles ordered by id.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    async fn find_role(&self, role_id: i64) -> AppResult<Option<Role>>;

    /// Fails with a conflict when the name is taken.
    async fn create_role(&self, name: &str, description: &str, is_super_admin: bool)
        -> AppResult<Role>;

    /// `None` when the role does not exist.
    async fn update_role(&self, role_id: i64, changes: &RoleChanges) -> AppResult<Option<Role>>;

    /// Delete a role together with its user and permission links.
    async fn delete_role(&self, role_id: i64) -> AppResult<bool>;

    /// Permissions linked to the role, ordered by code.
    async fn role_permissions(&self, role_id: i64) -> AppResult<Vec<Permission>>;

    /// Atomically drop every permission link of the role and link the
    /// permissions whose code is in `codes`. Unknown codes are skipped.
    /// Returns the number of links created.
    async fn replace_role_permissions(&self, role_id: i64, codes: &[String]) -> AppResult<u64>;
}

/// The permission catalogue.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// All permissions ordered by id.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Fails with a conflict when the code is taken.
    async fn create_permission(&self, code: &str, description: &str) -> AppResult<Permission>;

    /// Delete a permission; its role links go with it.
    async fn delete_permission(&self, permission_id: i64) -> AppResult<bool>;
}

/// The space → floor → warehouse → rack hierarchy.
#[async_trait]
pub trait WarehouseStore: Send + Sync + 'static {
    /// Atomically create a space and, when given, its main warehouse and
    /// that warehouse's racks.
    async fn create_space(
        &self,
        name: &str,
        space_type: SpaceType,
        description: &str,
        main_warehouse: Option<&NewWarehouse>,
    ) -> AppResult<Space>;

    async fn list_spaces(&self) -> AppResult<Vec<Space>>;

    async fn find_space(&self, space_id: i64) -> AppResult<Option<Space>>;

    /// A space with floors, warehouses and racks.
    async fn space_tree(&self, space_id: i64) -> AppResult<Option<SpaceTree>>;

    async fn create_floor(&self, space_id: i64, number: i32) -> AppResult<SpaceFloor>;

    async fn find_floor(&self, floor_id: i64) -> AppResult<Option<SpaceFloor>>;

    /// Create a warehouse on a floor, without racks.
    async fn create_warehouse_in_floor(
        &self,
        floor: &SpaceFloor,
        data: &NewWarehouse,
    ) -> AppResult<Warehouse>;

    async fn find_warehouse(&self, warehouse_id: i64) -> AppResult<Option<WarehouseWithRacks>>;

    /// Atomically apply `update`; when the result has racks, the rack list
    /// is replaced by `update.racks`. `None` when the warehouse is absent.
    async fn update_config(
        &self,
        warehouse_id: i64,
        update: &WarehouseConfigUpdate,
    ) -> AppResult<Option<Warehouse>>;
}
