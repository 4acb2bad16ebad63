use std::sync::Arc;

use estatery_application::{
    AuditRepository, AuthorizationService, BulkImportService, PropertyRepository, RoleRepository,
    RoleService, StaffRepository, StaffService,
};
use estatery_domain::ModuleStructure;
use estatery_infrastructure::{
    InMemoryPropertyRepository, InMemoryRoleRepository, InMemoryStaffRepository,
    PostgresAuditRepository, PostgresPropertyRepository, PostgresRoleRepository,
    PostgresStaffRepository, TracingAuditRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// Port implementations the services are wired against.
#[derive(Clone)]
pub struct Repositories {
    pub roles: Arc<dyn RoleRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub properties: Arc<dyn PropertyRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            roles: Arc::new(InMemoryRoleRepository::new()),
            staff: Arc::new(InMemoryStaffRepository::new()),
            properties: Arc::new(InMemoryPropertyRepository::new()),
            audit: Arc::new(TracingAuditRepository),
        }
    }

    pub fn postgres(pool: PgPool, structure: &'static ModuleStructure) -> Self {
        Self {
            roles: Arc::new(PostgresRoleRepository::new(pool.clone(), structure)),
            staff: Arc::new(PostgresStaffRepository::new(pool.clone())),
            properties: Arc::new(PostgresPropertyRepository::new(pool.clone())),
            audit: Arc::new(PostgresAuditRepository::new(pool)),
        }
    }
}

pub fn build_app_state(repositories: Repositories, config: &ApiConfig) -> AppState {
    let structure = ModuleStructure::standard();
    let authorization_service = AuthorizationService::new(
        repositories.roles.clone(),
        structure,
        config.strict_permission_paths,
    );

    AppState {
        role_service: RoleService::new(
            repositories.roles.clone(),
            repositories.staff.clone(),
            authorization_service.clone(),
            repositories.audit.clone(),
        ),
        staff_service: StaffService::new(
            repositories.staff,
            repositories.roles,
            authorization_service.clone(),
            repositories.audit.clone(),
        ),
        bulk_import_service: BulkImportService::new(
            repositories.properties,
            authorization_service.clone(),
            repositories.audit,
            config.bulk_upload_max_bytes,
        ),
        authorization_service,
    }
}
