use std::sync::Arc;

use estatery_domain::{ModuleStructure, role_names_match};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::PermissionResolver;
use crate::ports::RoleDirectory;

/// Session-scoped permission state for the signed-in staff member.
///
/// Readers take a snapshot of the current resolver; [`Self::refresh`]
/// replaces it in a single assignment once the role list has been fetched.
pub struct PermissionContext {
    directory: Arc<dyn RoleDirectory>,
    structure: &'static ModuleStructure,
    strict_paths: bool,
    current: RwLock<Arc<PermissionResolver>>,
}

impl PermissionContext {
    /// Creates a signed-out context.
    #[must_use]
    pub fn new(
        directory: Arc<dyn RoleDirectory>,
        structure: &'static ModuleStructure,
        strict_paths: bool,
    ) -> Self {
        Self {
            directory,
            structure,
            strict_paths,
            current: RwLock::new(Arc::new(
                PermissionResolver::signed_out(structure).with_strict_paths(strict_paths),
            )),
        }
    }

    /// Stores the signed-in role name. The tree stays absent until refreshed.
    pub async fn sign_in(&self, role_name: impl Into<String>) {
        let role_name = role_name.into();
        info!(role = %role_name, "permission context signed in");

        let resolver = PermissionResolver::for_role(self.structure, role_name, None)
            .with_strict_paths(self.strict_paths);
        *self.current.write().await = Arc::new(resolver);
    }

    /// Drops the role and its tree.
    pub async fn clear(&self) {
        let resolver =
            PermissionResolver::signed_out(self.structure).with_strict_paths(self.strict_paths);
        *self.current.write().await = Arc::new(resolver);
    }

    /// Returns a snapshot of the current resolver.
    pub async fn resolver(&self) -> Arc<PermissionResolver> {
        Arc::clone(&*self.current.read().await)
    }

    /// Checks an action against the current snapshot.
    pub async fn can(&self, path: &str, action: &str) -> bool {
        self.resolver().await.can(path, action)
    }

    /// Checks visibility against the current snapshot.
    pub async fn is_hidden(&self, path: &str) -> bool {
        self.resolver().await.is_hidden(path)
    }

    /// Reloads the signed-in role's tree from the role directory.
    ///
    /// Failures are logged and leave the previous state in place.
    pub async fn refresh(&self) {
        let Some(role_name) = self.resolver().await.role_name().map(str::to_owned) else {
            debug!("permission refresh skipped: no role signed in");
            return;
        };

        let roles = match self.directory.list_roles().await {
            Ok(roles) => roles,
            Err(error) => {
                error!(role = %role_name, %error, "failed to refresh role permissions");
                return;
            }
        };

        let permissions = roles
            .into_iter()
            .find(|role| role_names_match(role.name().as_str(), &role_name))
            .map(|role| role.permissions().clone());
        if permissions.is_none() {
            warn!(
                role = %role_name,
                "signed-in role not found in role list; permissions cleared"
            );
        }

        let mut current = self.current.write().await;
        if current.role_name() != Some(role_name.as_str()) {
            debug!(role = %role_name, "signed-in role changed during refresh; result dropped");
            return;
        }

        *current = Arc::new(
            PermissionResolver::for_role(self.structure, role_name, permissions)
                .with_strict_paths(self.strict_paths),
        );
    }
}

#[cfg(test)]
mod tests;
