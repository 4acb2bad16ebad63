use std::collections::HashMap;

use async_trait::async_trait;
use estatery_application::{RoleDirectory, RoleRepository};
use estatery_core::{AppError, AppResult, RecordId};
use estatery_domain::{Role, role_names_match};
use tokio::sync::RwLock;

/// In-memory role repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<RecordId, Role>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.read().await.values().cloned().collect();
        roles.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(roles)
    }

    async fn find_role(&self, role_id: RecordId) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .find(|role| role_names_match(role.name().as_str(), name))
            .cloned())
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;

        let clashing = roles.values().any(|existing| {
            existing.role_id() != role.role_id()
                && role_names_match(existing.name().as_str(), role.name().as_str())
        });
        if clashing {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        roles.insert(role.role_id(), role);
        Ok(())
    }

    async fn delete_role(&self, role_id: RecordId) -> AppResult<()> {
        self.roles
            .write()
            .await
            .remove(&role_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}

#[async_trait]
impl RoleDirectory for InMemoryRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        RoleRepository::list_roles(self).await
    }
}
