//! In-memory implementation of the store traits.
//!
//! Every table lives behind a single [`RwLock`]. Multi-row writes run
//! against a staged copy of the tables that replaces the live copy only
//! when every step succeeded, matching the transactions of the Postgres
//! repositories. Inserts into a chosen table can be made to fail so tests
//! can observe that a failed write leaves nothing behind. Intended for
//! tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use handsoft_core::error::AppError;
use handsoft_core::result::AppResult;
use handsoft_entity::address::{Address, AddressKey};
use handsoft_entity::geo::{City, Commune, Country, Region};
use handsoft_entity::rbac::{Permission, Role};
use handsoft_entity::user::contact::MOBILE_LABEL;
use handsoft_entity::user::{Contact, Location, NewUser, User, UserPhone, UserProfile};
use handsoft_entity::warehouse::{
    NewRack, NewWarehouse, Space, SpaceFloor, SpaceTree, SpaceType, Warehouse,
    WarehouseConfigUpdate, WarehouseRack, WarehouseWithRacks,
};

use crate::stores::{
    AddressStore, CredentialStore, LoginCandidate, PermissionStore, RbacStore, RoleChanges,
    RoleStore, WarehouseStore,
};

#[derive(Debug, Default, Clone)]
struct Tables {
    next_id: i64,
    countries: Vec<Country>,
    regions: Vec<Region>,
    cities: Vec<City>,
    communes: Vec<Commune>,
    addresses: Vec<Address>,
    users: Vec<User>,
    contacts: Vec<Contact>,
    phones: Vec<UserPhone>,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    role_permissions: Vec<(i64, i64)>,
    user_roles: Vec<(i64, i64)>,
    spaces: Vec<Space>,
    floors: Vec<SpaceFloor>,
    warehouses: Vec<Warehouse>,
    racks: Vec<WarehouseRack>,
    /// Table whose inserts fail with a database error.
    rejecting: Option<String>,
}

impl Tables {
    fn check_insert(&self, table: &str) -> AppResult<()> {
        if self.rejecting.as_deref() == Some(table) {
            return Err(AppError::database(format!("Insert into {table} rejected")));
        }
        Ok(())
    }

    fn push_warehouse(
        &mut self,
        space_id: i64,
        floor_id: Option<i64>,
        data: &NewWarehouse,
    ) -> AppResult<Warehouse> {
        self.check_insert("warehouses")?;
        let now = Utc::now();
        let warehouse = Warehouse {
            id: self.next_id(),
            space_id,
            floor_id,
            name: data.name.clone(),
            area_m2: data.area_m2,
            pallets_floor: data.pallets_floor,
            has_racks: data.has_racks,
            created_at: now,
            updated_at: now,
        };
        self.warehouses.push(warehouse.clone());
        Ok(warehouse)
    }

    fn push_racks(&mut self, warehouse_id: i64, racks: &[NewRack]) -> AppResult<()> {
        for rack in racks {
            self.check_insert("warehouse_racks")?;
            let now = Utc::now();
            let id = self.next_id();
            self.racks.push(WarehouseRack {
                id,
                warehouse_id,
                label: rack.label.clone(),
                levels: rack.levels,
                pallets_per_level: rack.pallets_per_level,
                length_m: rack.length_m,
                created_at: now,
                updated_at: now,
            });
        }
        Ok(())
    }

    fn racks_of(&self, warehouse_id: i64) -> Vec<WarehouseRack> {
        self.racks
            .iter()
            .filter(|r| r.warehouse_id == warehouse_id)
            .cloned()
            .collect()
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn role_id(&self, name: &str) -> Option<i64> {
        self.roles.iter().find(|r| r.name == name).map(|r| r.id)
    }

    fn ensure_role(&mut self, name: &str, is_super_admin: bool) -> i64 {
        if let Some(id) = self.role_id(name) {
            return id;
        }
        let id = self.next_id();
        let now = Utc::now();
        self.roles.push(Role {
            id,
            name: name.to_string(),
            description: String::new(),
            is_super_admin,
            created_at: now,
            updated_at: now,
        });
        id
    }

    fn role_names_of(&self, user_id: i64) -> Vec<String> {
        let mut names: Vec<String> = self
            .user_roles
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, rid)| self.roles.iter().find(|r| r.id == *rid))
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        names
    }

    fn location_of(&self, commune_id: i64) -> Option<Location> {
        let commune = self.communes.iter().find(|c| c.id == commune_id)?;
        let city = self.cities.iter().find(|c| c.id == commune.city_id)?;
        let region = self.regions.iter().find(|r| r.id == city.region_id)?;
        let country = self.countries.iter().find(|c| c.id == region.country_id)?;
        Some(Location {
            country: country.clone(),
            region: region.clone(),
            city: city.clone(),
            commune: commune.clone(),
        })
    }
}

/// In-memory store implementing every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::database("Store unavailable"));
        }
        Ok(())
    }

    /// Insert a commune together with a fresh country, region and city.
    /// Returns the commune id.
    pub async fn add_commune(&self, name: &str) -> i64 {
        let mut t = self.tables.write().await;
        let now = Utc::now();

        let existing = t.countries.first().map(|c| c.id);
        let country_id = match existing {
            Some(id) => id,
            None => {
                let id = t.next_id();
                t.countries.push(Country {
                    id,
                    name: "Chile".into(),
                    code: "CL".into(),
                    created_at: now,
                    updated_at: now,
                });
                id
            }
        };

        let region_id = t.next_id();
        t.regions.push(Region {
            id: region_id,
            country_id,
            name: format!("Region of {name}"),
            code: String::new(),
            created_at: now,
            updated_at: now,
        });

        let city_id = t.next_id();
        t.cities.push(City {
            id: city_id,
            region_id,
            name: format!("City of {name}"),
            created_at: now,
            updated_at: now,
        });

        let commune_id = t.next_id();
        t.communes.push(Commune {
            id: commune_id,
            city_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        });
        commune_id
    }

    /// Insert a role, or return the existing one with the same name.
    pub async fn add_role(&self, name: &str, is_super_admin: bool) -> i64 {
        self.tables.write().await.ensure_role(name, is_super_admin)
    }

    /// Link a permission code to a role, creating both when missing.
    pub async fn grant(&self, role_name: &str, code: &str) {
        let mut t = self.tables.write().await;
        let role_id = t.ensure_role(role_name, false);

        let existing = t.permissions.iter().find(|p| p.code == code).map(|p| p.id);
        let permission_id = match existing {
            Some(id) => id,
            None => {
                let id = t.next_id();
                let now = Utc::now();
                t.permissions.push(Permission {
                    id,
                    code: code.to_string(),
                    description: String::new(),
                    created_at: now,
                    updated_at: now,
                });
                id
            }
        };

        if !t.role_permissions.contains(&(role_id, permission_id)) {
            t.role_permissions.push((role_id, permission_id));
        }
    }

    /// Enable or disable a user account.
    pub async fn set_active(&self, user_id: i64, is_active: bool) {
        let mut t = self.tables.write().await;
        if let Some(user) = t.users.iter_mut().find(|u| u.id == user_id) {
            user.is_active = is_active;
        }
    }

    /// Number of stored addresses.
    pub async fn address_count(&self) -> usize {
        self.tables.read().await.addresses.len()
    }

    /// Number of stored warehouses, across all spaces.
    pub async fn warehouse_count(&self) -> usize {
        self.tables.read().await.warehouses.len()
    }

    /// Make inserts into `table` fail, or stop doing so with `None`.
    /// Table names follow the Postgres schema, e.g. `warehouse_racks`.
    pub async fn reject_inserts_into(&self, table: Option<&str>) {
        self.tables.write().await.rejecting = table.map(str::to_string);
    }

    /// Run `write` against a copy of the tables and keep the copy only
    /// when it succeeds.
    async fn staged<T>(&self, write: impl FnOnce(&mut Tables) -> AppResult<T>) -> AppResult<T> {
        self.check()?;
        let mut live = self.tables.write().await;
        let mut staged = live.clone();
        let value = write(&mut staged)?;
        *live = staged;
        Ok(value)
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn email_or_username_taken(&self, email: &str, username: &str) -> AppResult<bool> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t
            .users
            .iter()
            .any(|u| u.email == email || u.username == username))
    }

    async fn find_for_login(
        &self,
        email: &str,
        username: &str,
    ) -> AppResult<Option<LoginCandidate>> {
        self.check()?;
        let t = self.tables.read().await;
        let user = t
            .users
            .iter()
            .find(|u| u.email == email)
            .or_else(|| t.users.iter().find(|u| u.username == username));

        Ok(user.map(|u| LoginCandidate {
            user: u.clone(),
            roles: t.role_names_of(u.id),
        }))
    }

    async fn create_registered(&self, data: &NewUser) -> AppResult<User> {
        self.check()?;
        let mut t = self.tables.write().await;

        if t.users.iter().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' already exists",
                data.username
            )));
        }
        if t.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' already exists",
                data.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: t.next_id(),
            email: data.email.clone(),
            username: data.username.clone(),
            password_hash: data.password_hash.clone(),
            is_active: true,
            commune_id: Some(data.commune_id),
            address_id: Some(data.address_id),
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());

        let contact_id = t.next_id();
        t.contacts.push(Contact {
            id: contact_id,
            user_id: user.id,
            full_name: data.full_name.clone(),
            created_at: now,
            updated_at: now,
        });

        if let Some(phone) = data.phone.as_deref().filter(|p| !p.is_empty()) {
            let phone_id = t.next_id();
            t.phones.push(UserPhone {
                id: phone_id,
                user_id: user.id,
                label: MOBILE_LABEL.to_string(),
                number: phone.to_string(),
                is_main: true,
                created_at: now,
                updated_at: now,
            });
        }

        for name in &data.role_names {
            let role_id = t.ensure_role(name, false);
            t.user_roles.push((user.id, role_id));
        }

        Ok(user)
    }

    async fn find_profile(&self, user_id: i64) -> AppResult<Option<UserProfile>> {
        self.check()?;
        let t = self.tables.read().await;
        let Some(user) = t.users.iter().find(|u| u.id == user_id).cloned() else {
            return Ok(None);
        };

        let address = user
            .address_id
            .and_then(|id| t.addresses.iter().find(|a| a.id == id).cloned());
        let location = address.as_ref().and_then(|a| t.location_of(a.commune_id));

        Ok(Some(UserProfile {
            contact: t.contacts.iter().find(|c| c.user_id == user_id).cloned(),
            phones: t
                .phones
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect(),
            address,
            location,
            roles: t.role_names_of(user_id),
            user,
        }))
    }

    async fn replace_roles(&self, user_id: i64, role_names: &[String]) -> AppResult<Vec<String>> {
        self.check()?;
        let mut t = self.tables.write().await;

        if !t.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        let mut role_ids = Vec::with_capacity(role_names.len());
        for name in role_names {
            let id = t
                .role_id(name)
                .ok_or_else(|| AppError::validation(format!("Unknown role: '{name}'")))?;
            if !role_ids.contains(&id) {
                role_ids.push(id);
            }
        }

        t.user_roles.retain(|(uid, _)| *uid != user_id);
        t.user_roles
            .extend(role_ids.into_iter().map(|rid| (user_id, rid)));

        Ok(t.role_names_of(user_id))
    }
}

#[async_trait]
impl AddressStore for MemoryStore {
    async fn commune_exists(&self, commune_id: i64) -> AppResult<bool> {
        self.check()?;
        Ok(self
            .tables
            .read()
            .await
            .communes
            .iter()
            .any(|c| c.id == commune_id))
    }

    async fn find_address(&self, key: &AddressKey) -> AppResult<Option<Address>> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t.addresses.iter().find(|a| a.key() == *key).cloned())
    }

    async fn insert_address(&self, key: &AddressKey) -> AppResult<Address> {
        self.check()?;
        let mut t = self.tables.write().await;

        if let Some(existing) = t.addresses.iter().find(|a| a.key() == *key) {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let address = Address {
            id: t.next_id(),
            commune_id: key.commune_id,
            street: key.street.clone(),
            street_number: key.street_number.clone(),
            is_condominium: key.is_condominium,
            condominium_house_number: key.condominium_house_number.clone(),
            building_number: key.building_number.clone(),
            apartment_number: key.apartment_number.clone(),
            extra: key.extra.clone(),
            created_at: now,
            updated_at: now,
        };
        t.addresses.push(address.clone());
        Ok(address)
    }
}

#[async_trait]
impl RbacStore for MemoryStore {
    async fn any_super_admin(&self, role_names: &[String]) -> AppResult<bool> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t
            .roles
            .iter()
            .any(|r| r.is_super_admin && role_names.contains(&r.name)))
    }

    async fn any_grants(&self, role_names: &[String], code: &str) -> AppResult<bool> {
        self.check()?;
        let t = self.tables.read().await;
        let Some(permission) = t.permissions.iter().find(|p| p.code == code) else {
            return Ok(false);
        };

        Ok(t
            .roles
            .iter()
            .filter(|r| role_names.contains(&r.name))
            .any(|r| t.role_permissions.contains(&(r.id, permission.id))))
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.check()?;
        Ok(self.tables.read().await.roles.clone())
    }

    async fn find_role(&self, role_id: i64) -> AppResult<Option<Role>> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t.roles.iter().find(|r| r.id == role_id).cloned())
    }

    async fn create_role(
        &self,
        name: &str,
        description: &str,
        is_super_admin: bool,
    ) -> AppResult<Role> {
        self.staged(|t| {
            if t.role_id(name).is_some() {
                return Err(AppError::conflict(format!("Role '{name}' already exists")));
            }
            t.check_insert("roles")?;
            let now = Utc::now();
            let role = Role {
                id: t.next_id(),
                name: name.to_string(),
                description: description.to_string(),
                is_super_admin,
                created_at: now,
                updated_at: now,
            };
            t.roles.push(role.clone());
            Ok(role)
        })
        .await
    }

    async fn update_role(&self, role_id: i64, changes: &RoleChanges) -> AppResult<Option<Role>> {
        self.staged(|t| {
            if let Some(name) = &changes.name {
                if t.roles.iter().any(|r| r.id != role_id && r.name == *name) {
                    return Err(AppError::conflict(format!("Role '{name}' already exists")));
                }
            }
            let Some(role) = t.roles.iter_mut().find(|r| r.id == role_id) else {
                return Ok(None);
            };
            if let Some(name) = &changes.name {
                role.name.clone_from(name);
            }
            if let Some(description) = &changes.description {
                role.description.clone_from(description);
            }
            if let Some(flag) = changes.is_super_admin {
                role.is_super_admin = flag;
            }
            role.updated_at = Utc::now();
            Ok(Some(role.clone()))
        })
        .await
    }

    async fn delete_role(&self, role_id: i64) -> AppResult<bool> {
        self.staged(|t| {
            let before = t.roles.len();
            t.roles.retain(|r| r.id != role_id);
            t.user_roles.retain(|(_, rid)| *rid != role_id);
            t.role_permissions.retain(|(rid, _)| *rid != role_id);
            Ok(t.roles.len() < before)
        })
        .await
    }

    async fn role_permissions(&self, role_id: i64) -> AppResult<Vec<Permission>> {
        self.check()?;
        let t = self.tables.read().await;
        let mut linked: Vec<Permission> = t
            .permissions
            .iter()
            .filter(|p| t.role_permissions.contains(&(role_id, p.id)))
            .cloned()
            .collect();
        linked.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(linked)
    }

    async fn replace_role_permissions(&self, role_id: i64, codes: &[String]) -> AppResult<u64> {
        self.staged(|t| {
            t.role_permissions.retain(|(rid, _)| *rid != role_id);

            let ids: Vec<i64> = t
                .permissions
                .iter()
                .filter(|p| codes.contains(&p.code))
                .map(|p| p.id)
                .collect();
            for id in &ids {
                t.check_insert("role_permissions")?;
                t.role_permissions.push((role_id, *id));
            }
            Ok(ids.len() as u64)
        })
        .await
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.check()?;
        Ok(self.tables.read().await.permissions.clone())
    }

    async fn create_permission(&self, code: &str, description: &str) -> AppResult<Permission> {
        self.staged(|t| {
            if t.permissions.iter().any(|p| p.code == code) {
                return Err(AppError::conflict(format!("Permission '{code}' already exists")));
            }
            t.check_insert("permissions")?;
            let now = Utc::now();
            let permission = Permission {
                id: t.next_id(),
                code: code.to_string(),
                description: description.to_string(),
                created_at: now,
                updated_at: now,
            };
            t.permissions.push(permission.clone());
            Ok(permission)
        })
        .await
    }

    async fn delete_permission(&self, permission_id: i64) -> AppResult<bool> {
        self.staged(|t| {
            let before = t.permissions.len();
            t.permissions.retain(|p| p.id != permission_id);
            t.role_permissions.retain(|(_, pid)| *pid != permission_id);
            Ok(t.permissions.len() < before)
        })
        .await
    }
}

#[async_trait]
impl WarehouseStore for MemoryStore {
    async fn create_space(
        &self,
        name: &str,
        space_type: SpaceType,
        description: &str,
        main_warehouse: Option<&NewWarehouse>,
    ) -> AppResult<Space> {
        self.staged(|t| {
            t.check_insert("spaces")?;
            let now = Utc::now();
            let space = Space {
                id: t.next_id(),
                name: name.to_string(),
                space_type,
                description: description.to_string(),
                created_at: now,
                updated_at: now,
            };
            t.spaces.push(space.clone());

            if let Some(data) = main_warehouse {
                let warehouse = t.push_warehouse(space.id, None, data)?;
                if data.has_racks {
                    t.push_racks(warehouse.id, &data.racks)?;
                }
            }
            Ok(space)
        })
        .await
    }

    async fn list_spaces(&self) -> AppResult<Vec<Space>> {
        self.check()?;
        Ok(self.tables.read().await.spaces.clone())
    }

    async fn find_space(&self, space_id: i64) -> AppResult<Option<Space>> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t.spaces.iter().find(|s| s.id == space_id).cloned())
    }

    async fn space_tree(&self, space_id: i64) -> AppResult<Option<SpaceTree>> {
        self.check()?;
        let t = self.tables.read().await;
        let Some(space) = t.spaces.iter().find(|s| s.id == space_id).cloned() else {
            return Ok(None);
        };

        let mut floors: Vec<SpaceFloor> = t
            .floors
            .iter()
            .filter(|f| f.space_id == space_id)
            .cloned()
            .collect();
        floors.sort_by_key(|f| (f.number, f.id));

        let warehouses: Vec<Warehouse> = t
            .warehouses
            .iter()
            .filter(|w| w.space_id == space_id)
            .cloned()
            .collect();
        let racks = warehouses.iter().flat_map(|w| t.racks_of(w.id)).collect();

        Ok(Some(SpaceTree::assemble(space, floors, warehouses, racks)))
    }

    async fn create_floor(&self, space_id: i64, number: i32) -> AppResult<SpaceFloor> {
        self.staged(|t| {
            t.check_insert("space_floors")?;
            let now = Utc::now();
            let floor = SpaceFloor {
                id: t.next_id(),
                space_id,
                number,
                created_at: now,
                updated_at: now,
            };
            t.floors.push(floor.clone());
            Ok(floor)
        })
        .await
    }

    async fn find_floor(&self, floor_id: i64) -> AppResult<Option<SpaceFloor>> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t.floors.iter().find(|f| f.id == floor_id).cloned())
    }

    async fn create_warehouse_in_floor(
        &self,
        floor: &SpaceFloor,
        data: &NewWarehouse,
    ) -> AppResult<Warehouse> {
        self.staged(|t| t.push_warehouse(floor.space_id, Some(floor.id), data))
            .await
    }

    async fn find_warehouse(&self, warehouse_id: i64) -> AppResult<Option<WarehouseWithRacks>> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t
            .warehouses
            .iter()
            .find(|w| w.id == warehouse_id)
            .map(|w| WarehouseWithRacks {
                warehouse: w.clone(),
                racks: t.racks_of(w.id),
            }))
    }

    async fn update_config(
        &self,
        warehouse_id: i64,
        update: &WarehouseConfigUpdate,
    ) -> AppResult<Option<Warehouse>> {
        self.staged(|t| {
            let Some(warehouse) = t.warehouses.iter_mut().find(|w| w.id == warehouse_id) else {
                return Ok(None);
            };
            update.apply_to(warehouse);
            warehouse.updated_at = Utc::now();
            let warehouse = warehouse.clone();

            if warehouse.has_racks {
                t.racks.retain(|r| r.warehouse_id != warehouse_id);
                t.push_racks(warehouse_id, &update.racks)?;
            }
            Ok(Some(warehouse))
        })
        .await
    }
}
