use estatery_domain::Staff;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for staff creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-staff-request.ts"
)]
pub struct CreateStaffRequest {
    pub display_name: String,
    #[ts(optional)]
    pub email: Option<String>,
    pub role_name: String,
}

/// API representation of a staff member.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/staff-response.ts"
)]
pub struct StaffResponse {
    pub staff_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role_name: String,
}

impl From<Staff> for StaffResponse {
    fn from(value: Staff) -> Self {
        Self {
            staff_id: value.staff_id().to_string(),
            display_name: value.display_name().as_str().to_owned(),
            email: value.email().map(str::to_owned),
            role_name: value.role_name().as_str().to_owned(),
        }
    }
}
