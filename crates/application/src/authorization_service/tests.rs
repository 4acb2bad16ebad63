use std::sync::Arc;

use async_trait::async_trait;

use estatery_core::{AppError, AppResult, RecordId, StaffIdentity};
use estatery_domain::{
    CONTROL_EDIT, CONTROL_VIEW, ModuleStructure, PermissionPath, Role, RoleStatus,
    role_names_match,
};

use crate::ports::RoleRepository;

use super::AuthorizationService;

struct FakeRoleRepository {
    roles: Vec<Role>,
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.clone())
    }

    async fn find_role(&self, role_id: RecordId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .iter()
            .find(|role| role.role_id() == role_id)
            .cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .iter()
            .find(|role| role_names_match(role.name().as_str(), name))
            .cloned())
    }

    async fn save_role(&self, _role: Role) -> AppResult<()> {
        Ok(())
    }

    async fn delete_role(&self, _role_id: RecordId) -> AppResult<()> {
        Ok(())
    }
}

fn landlord_viewer() -> Role {
    let structure = ModuleStructure::standard();
    let mut role = match Role::new("Landlord Viewer", RoleStatus::Active, false, structure) {
        Ok(role) => role,
        Err(error) => panic!("invalid test role: {error}"),
    };
    let landlords = match PermissionPath::parse(structure, "landlords") {
        Ok(path) => path,
        Err(error) => panic!("invalid test path: {error}"),
    };
    assert!(
        role.permissions_mut()
            .set_control(structure, &landlords, CONTROL_VIEW, true)
            .is_ok()
    );
    role
}

fn service(strict_paths: bool) -> AuthorizationService {
    AuthorizationService::new(
        Arc::new(FakeRoleRepository {
            roles: vec![landlord_viewer()],
        }),
        ModuleStructure::standard(),
        strict_paths,
    )
}

fn staff(role_name: &str) -> StaffIdentity {
    StaffIdentity::new(RecordId::new(), "Linh", role_name)
}

#[tokio::test]
async fn persisted_tree_drives_checks() {
    let service = service(false);
    let actor = staff("landlord viewer");

    assert_eq!(service.can(&actor, "landlords", CONTROL_VIEW).await, Ok(true));
    assert_eq!(service.can(&actor, "landlords", CONTROL_EDIT).await, Ok(false));
}

#[tokio::test]
async fn require_reports_the_missing_action() {
    let service = service(false);
    let actor = staff("Landlord Viewer");

    let result = service.require(&actor, "landlords", CONTROL_EDIT).await;

    match result {
        Err(AppError::Forbidden(message)) => {
            assert!(message.contains("'edit' on 'landlords'"));
            assert!(message.contains("Landlord Viewer"));
        }
        other => panic!("edit should be forbidden, got {other:?}"),
    }
}

#[tokio::test]
async fn vanished_role_is_denied() {
    let service = service(false);
    let actor = staff("Former Team");

    let resolver = match service.resolver_for(&actor).await {
        Ok(resolver) => resolver,
        Err(error) => panic!("resolver should build: {error}"),
    };

    assert!(resolver.permissions().is_none());
    assert!(!resolver.can("landlords", CONTROL_VIEW));
    assert!(resolver.is_hidden("landlords"));
}

#[tokio::test]
async fn strict_mode_denies_undeclared_paths() {
    let actor = staff("Landlord Viewer");

    assert_eq!(
        service(false).can(&actor, "legacyReports", CONTROL_VIEW).await,
        Ok(true)
    );
    assert_eq!(
        service(true).can(&actor, "legacyReports", CONTROL_VIEW).await,
        Ok(false)
    );
}

#[tokio::test]
async fn admin_without_persisted_tree_is_allowed() {
    let service = service(false);
    let actor = staff("Admin");

    assert_eq!(service.can(&actor, "users", CONTROL_EDIT).await, Ok(true));
}
