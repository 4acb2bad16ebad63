mod bulk_upload;
mod permissions;
mod properties;
mod roles;
mod staff;

use serde::Serialize;
use ts_rs::TS;

pub use bulk_upload::{
    BulkUploadDataResponse, BulkUploadRequest, BulkUploadResponse, FieldErrorResponse,
    RowErrorsResponse,
};
pub use permissions::{
    ModuleSectionResponse, MyPermissionsQuery, MyPermissionsResponse, PermissionCheckResponse,
    SubModuleResponse,
};
pub use properties::{ListPropertiesQuery, PropertyListingResponse};
pub use roles::{
    CreateRoleRequest, RoleResponse, SetRoleAccessRequest, SetRoleControlRequest,
    UpdateRoleRequest,
};
pub use staff::{CreateStaffRequest, StaffResponse};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}
