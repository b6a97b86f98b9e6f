//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use handsoft_database::repositories::RoleChanges;
use handsoft_entity::warehouse::{NewRack, NewWarehouse, WarehouseConfigUpdate};
use handsoft_service::AddressInput;
use handsoft_service::admin::NewRoleInput;
use handsoft_service::auth::RegisterInput;
use handsoft_service::warehouse::CreateSpaceInput;

// ── Auth ─────────────────────────────────────────────────────────────

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 3, max = 32, message = "Username must be 3 to 32 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,

    pub commune_id: i64,
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "Street number is required"))]
    pub street_number: String,
    #[serde(default)]
    pub is_condominium: bool,
    pub condominium_house_number: Option<String>,
    pub building_number: Option<String>,
    pub apartment_number: Option<String>,
    pub extra: Option<String>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            password: req.password,
            full_name: req.full_name,
            phone: req.phone,
            address: AddressInput {
                commune_id: req.commune_id,
                street: req.street,
                street_number: req.street_number,
                is_condominium: req.is_condominium,
                condominium_house_number: req.condominium_house_number,
                building_number: req.building_number,
                apartment_number: req.apartment_number,
                extra: req.extra,
            },
        }
    }
}

/// Login request body. `login` is an email or a username.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ── Geography ────────────────────────────────────────────────────────

/// Query string of `GET /geo/communes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommuneSearchQuery {
    #[serde(default)]
    pub search: String,
}

// ── Administration ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_super_admin: bool,
}

impl From<CreateRoleRequest> for NewRoleInput {
    fn from(req: CreateRoleRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            is_super_admin: req.is_super_admin,
        }
    }
}

/// Partial role update; absent fields stay unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_super_admin: Option<bool>,
}

impl From<UpdateRoleRequest> for RoleChanges {
    fn from(req: UpdateRoleRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            is_super_admin: req.is_super_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetRolePermissionsRequest {
    pub permission_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePermissionRequest {
    #[validate(length(min = 3, max = 100))]
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetUserRolesRequest {
    pub role_names: Vec<String>,
}

// ── Warehousing ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSpaceRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// `open_area` or `building`.
    #[serde(rename = "type")]
    pub space_type: String,
    pub description: Option<String>,
    #[validate(nested)]
    pub open_area_warehouse: Option<WarehouseRequest>,
}

impl From<CreateSpaceRequest> for CreateSpaceInput {
    fn from(req: CreateSpaceRequest) -> Self {
        Self {
            name: req.name,
            space_type: req.space_type,
            description: req.description,
            open_area_warehouse: req.open_area_warehouse.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WarehouseRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub area_m2: f64,
    #[serde(default)]
    pub pallets_floor: i32,
    #[serde(default)]
    pub has_racks: bool,
    #[serde(default)]
    pub racks: Vec<RackRequest>,
}

impl From<WarehouseRequest> for NewWarehouse {
    fn from(req: WarehouseRequest) -> Self {
        Self {
            name: req.name,
            area_m2: req.area_m2,
            pallets_floor: req.pallets_floor,
            has_racks: req.has_racks,
            racks: req.racks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackRequest {
    pub label: String,
    #[serde(default)]
    pub levels: i32,
    #[serde(default)]
    pub pallets_per_level: i32,
    #[serde(default)]
    pub length_m: f64,
}

impl From<RackRequest> for NewRack {
    fn from(req: RackRequest) -> Self {
        Self {
            label: req.label,
            levels: req.levels,
            pallets_per_level: req.pallets_per_level,
            length_m: req.length_m,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFloorRequest {
    pub number: i32,
}

/// Partial warehouse configuration. `racks` replaces every rack when the
/// resulting warehouse has racks.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateWarehouseConfigRequest {
    pub area_m2: Option<f64>,
    pub pallets_floor: Option<i32>,
    pub has_racks: Option<bool>,
    #[serde(default)]
    pub racks: Vec<RackRequest>,
}

impl From<UpdateWarehouseConfigRequest> for WarehouseConfigUpdate {
    fn from(req: UpdateWarehouseConfigRequest) -> Self {
        Self {
            area_m2: req.area_m2,
            pallets_floor: req.pallets_floor,
            has_racks: req.has_racks,
            racks: req.racks.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "not-an-email",
            "username": "ab",
            "password": "password123",
            "commune_id": 1,
            "street": "Main",
            "street_number": "1"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("username"));
    }

    #[test]
    fn test_create_space_reads_type_field() {
        let req: CreateSpaceRequest = serde_json::from_value(serde_json::json!({
            "name": "Yard",
            "type": "open_area",
            "open_area_warehouse": { "name": "Main", "racks": [{ "label": "A1" }] }
        }))
        .unwrap();
        let input = CreateSpaceInput::from(req);
        assert_eq!(input.space_type, "open_area");
        let warehouse = input.open_area_warehouse.unwrap();
        assert_eq!(warehouse.racks[0].label, "A1");
        assert_eq!(warehouse.pallets_floor, 0);
    }
}
