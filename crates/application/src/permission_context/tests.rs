use std::sync::Arc;

use async_trait::async_trait;
use estatery_core::{AppError, AppResult};
use estatery_domain::{
    CONTROL_VIEW, ModuleStructure, PermissionPath, Role, RoleStatus,
};
use tokio::sync::Mutex;

use crate::ports::RoleDirectory;

use super::PermissionContext;

struct FakeRoleDirectory {
    response: Mutex<AppResult<Vec<Role>>>,
}

impl FakeRoleDirectory {
    fn with(response: AppResult<Vec<Role>>) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
        })
    }

    async fn respond_with(&self, response: AppResult<Vec<Role>>) {
        *self.response.lock().await = response;
    }
}

#[async_trait]
impl RoleDirectory for FakeRoleDirectory {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.response.lock().await.clone()
    }
}

fn role_with_dashboard_view(name: &str) -> Role {
    let structure = ModuleStructure::standard();
    let mut role = match Role::new(name, RoleStatus::Active, false, structure) {
        Ok(role) => role,
        Err(error) => panic!("invalid test role: {error}"),
    };
    let dashboard = match PermissionPath::parse(structure, "dashboard") {
        Ok(path) => path,
        Err(error) => panic!("invalid test path: {error}"),
    };
    let granted = role
        .permissions_mut()
        .set_control(structure, &dashboard, CONTROL_VIEW, true)
        .and_then(|()| role.permissions_mut().set_access(structure, &dashboard, true));
    assert!(granted.is_ok());
    role
}

#[tokio::test]
async fn refresh_loads_tree_for_matching_role_name() {
    let directory = FakeRoleDirectory::with(Ok(vec![role_with_dashboard_view("Sales Manager")]));
    let context = PermissionContext::new(directory, ModuleStructure::standard(), false);

    context.sign_in("  sales   MANAGER ").await;
    assert!(!context.can("dashboard", CONTROL_VIEW).await);

    context.refresh().await;
    assert!(context.can("dashboard", CONTROL_VIEW).await);
    assert!(!context.is_hidden("dashboard").await);
    assert!(context.is_hidden("landlords").await);
}

#[tokio::test]
async fn refresh_failure_keeps_previous_tree() {
    let directory = FakeRoleDirectory::with(Ok(vec![role_with_dashboard_view("Sales Manager")]));
    let context = PermissionContext::new(directory.clone(), ModuleStructure::standard(), false);
    context.sign_in("Sales Manager").await;
    context.refresh().await;

    directory
        .respond_with(Err(AppError::Upstream("backend unavailable".to_owned())))
        .await;
    context.refresh().await;

    assert!(context.can("dashboard", CONTROL_VIEW).await);
}

#[tokio::test]
async fn refresh_without_match_clears_tree() {
    let directory = FakeRoleDirectory::with(Ok(vec![role_with_dashboard_view("Sales Manager")]));
    let context = PermissionContext::new(directory.clone(), ModuleStructure::standard(), false);
    context.sign_in("Sales Manager").await;
    context.refresh().await;

    directory.respond_with(Ok(Vec::new())).await;
    context.refresh().await;

    let resolver = context.resolver().await;
    assert!(resolver.permissions().is_none());
    assert!(!resolver.can("dashboard", CONTROL_VIEW));
}

#[tokio::test]
async fn admin_keeps_access_until_refresh_and_clear_signs_out() {
    let directory = FakeRoleDirectory::with(Err(AppError::Upstream("offline".to_owned())));
    let context = PermissionContext::new(directory, ModuleStructure::standard(), false);

    context.sign_in("admin").await;
    context.refresh().await;
    assert!(context.can("landlords", "delete").await);

    context.clear().await;
    assert!(!context.can("landlords", "delete").await);
    assert!(context.is_hidden("landlords").await);
    assert!(context.resolver().await.role_name().is_none());
}

#[tokio::test]
async fn snapshots_survive_a_later_swap() {
    let directory = FakeRoleDirectory::with(Ok(vec![role_with_dashboard_view("Sales Manager")]));
    let context = PermissionContext::new(directory, ModuleStructure::standard(), true);
    context.sign_in("Sales Manager").await;

    let before = context.resolver().await;
    context.refresh().await;

    assert!(before.permissions().is_none());
    assert!(context.resolver().await.permissions().is_some());
    assert!(context.resolver().await.strict_paths());
}
