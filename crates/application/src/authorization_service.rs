use std::sync::Arc;

use estatery_core::{AppError, AppResult, StaffIdentity};
use estatery_domain::ModuleStructure;
use tracing::debug;

use crate::PermissionResolver;
use crate::ports::RoleRepository;

/// Server-side permission checks against persisted roles.
#[derive(Clone)]
pub struct AuthorizationService {
    role_repository: Arc<dyn RoleRepository>,
    structure: &'static ModuleStructure,
    strict_paths: bool,
}

impl AuthorizationService {
    /// Creates a new authorization service from a role repository.
    #[must_use]
    pub fn new(
        role_repository: Arc<dyn RoleRepository>,
        structure: &'static ModuleStructure,
        strict_paths: bool,
    ) -> Self {
        Self {
            role_repository,
            structure,
            strict_paths,
        }
    }

    /// Returns the module structure checks run against.
    #[must_use]
    pub fn structure(&self) -> &'static ModuleStructure {
        self.structure
    }

    /// Builds a resolver from the actor's persisted role.
    ///
    /// An actor whose role no longer exists gets a resolver without a tree.
    pub async fn resolver_for(&self, actor: &StaffIdentity) -> AppResult<PermissionResolver> {
        let permissions = self
            .role_repository
            .find_role_by_name(actor.role_name())
            .await?
            .map(|role| role.permissions().clone());

        if permissions.is_none() {
            debug!(
                subject = %actor.subject(),
                role = actor.role_name(),
                "actor role has no persisted permission tree"
            );
        }

        Ok(
            PermissionResolver::for_role(self.structure, actor.role_name(), permissions)
                .with_strict_paths(self.strict_paths),
        )
    }

    /// Returns whether the actor may perform `action` on `path`.
    pub async fn can(&self, actor: &StaffIdentity, path: &str, action: &str) -> AppResult<bool> {
        Ok(self.resolver_for(actor).await?.can(path, action))
    }

    /// Ensures the actor may perform `action` on `path`.
    pub async fn require(&self, actor: &StaffIdentity, path: &str, action: &str) -> AppResult<()> {
        if self.can(actor, path, action).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "staff '{}' with role '{}' is missing '{action}' on '{path}'",
            actor.subject(),
            actor.role_name()
        )))
    }
}

#[cfg(test)]
mod tests;
