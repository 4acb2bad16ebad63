use estatery_application::{AuthorizationService, BulkImportService, RoleService, StaffService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub role_service: RoleService,
    pub staff_service: StaffService,
    pub bulk_import_service: BulkImportService,
}
