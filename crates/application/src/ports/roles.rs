use async_trait::async_trait;
use estatery_core::{AppResult, RecordId};
use estatery_domain::Role;

/// Repository port for role persistence.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds a role by identifier.
    async fn find_role(&self, role_id: RecordId) -> AppResult<Option<Role>>;

    /// Finds a role by name, ignoring case and surrounding whitespace.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Inserts or replaces a role.
    async fn save_role(&self, role: Role) -> AppResult<()>;

    /// Deletes a role by identifier.
    async fn delete_role(&self, role_id: RecordId) -> AppResult<()>;
}
