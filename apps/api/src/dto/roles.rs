use estatery_domain::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[ts(optional)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_approver: bool,
}

/// Incoming payload for role updates. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(optional)]
    pub status: Option<String>,
    #[ts(optional)]
    pub is_approver: Option<bool>,
    #[ts(optional, type = "Record<string, unknown>")]
    pub permissions: Option<Value>,
}

/// Incoming payload for toggling one control.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/set-role-control-request.ts"
)]
pub struct SetRoleControlRequest {
    pub path: String,
    pub control: String,
    pub value: bool,
}

/// Incoming payload for the access toggle of one node.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/set-role-access-request.ts"
)]
pub struct SetRoleAccessRequest {
    pub path: String,
    pub enabled: bool,
}

/// API representation of a role and its permission tree.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub status: String,
    pub is_approver: bool,
    #[ts(type = "Record<string, Record<string, unknown>>")]
    pub permissions: Value,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.role_id().to_string(),
            name: value.name().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            is_approver: value.is_approver(),
            permissions: value.permissions().to_value(),
        }
    }
}
