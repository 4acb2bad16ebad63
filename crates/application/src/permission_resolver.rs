use estatery_domain::{
    CONTROL_HIDE, ModuleStructure, PermissionTree, TreeLookup, is_admin_role, is_super_admin_role,
};
use tracing::warn;

/// Pure permission checks for one signed-in role.
///
/// Resolution order for [`PermissionResolver::can`]:
/// no role denies, the super admin role allows, the admin role allows while
/// no tree is loaded, a missing tree denies, a path segment absent from the
/// tree allows, and otherwise only a stored `true` allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionResolver {
    structure: &'static ModuleStructure,
    role_name: Option<String>,
    permissions: Option<PermissionTree>,
    strict_paths: bool,
}

impl PermissionResolver {
    /// Creates a resolver with no signed-in role.
    #[must_use]
    pub fn signed_out(structure: &'static ModuleStructure) -> Self {
        Self {
            structure,
            role_name: None,
            permissions: None,
            strict_paths: false,
        }
    }

    /// Creates a resolver for a role and its tree, if one has been loaded.
    #[must_use]
    pub fn for_role(
        structure: &'static ModuleStructure,
        role_name: impl Into<String>,
        permissions: Option<PermissionTree>,
    ) -> Self {
        Self {
            structure,
            role_name: Some(role_name.into()),
            permissions,
            strict_paths: false,
        }
    }

    /// Denies paths the module structure does not declare.
    #[must_use]
    pub fn with_strict_paths(mut self, strict_paths: bool) -> Self {
        self.strict_paths = strict_paths;
        self
    }

    /// Returns the signed-in role name.
    #[must_use]
    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }

    /// Returns the loaded permission tree.
    #[must_use]
    pub fn permissions(&self) -> Option<&PermissionTree> {
        self.permissions.as_ref()
    }

    /// Returns whether strict path checking is enabled.
    #[must_use]
    pub fn strict_paths(&self) -> bool {
        self.strict_paths
    }

    /// Returns whether the role may perform `action` on `path`.
    #[must_use]
    pub fn can(&self, path: &str, action: &str) -> bool {
        let Some(role_name) = self.role_name.as_deref() else {
            return false;
        };
        if is_super_admin_role(role_name) {
            return true;
        }
        let Some(permissions) = &self.permissions else {
            return is_admin_role(role_name);
        };
        if !self.accepts_path(path) {
            return false;
        }

        match permissions.lookup(path) {
            TreeLookup::Miss => true,
            TreeLookup::Group(_) => false,
            TreeLookup::Controls(controls) => controls.get(action).copied().unwrap_or(false),
        }
    }

    /// Returns whether the navigation entry for `path` is hidden.
    #[must_use]
    pub fn is_hidden(&self, path: &str) -> bool {
        let Some(role_name) = self.role_name.as_deref() else {
            return true;
        };
        if is_super_admin_role(role_name) {
            return false;
        }
        let Some(permissions) = &self.permissions else {
            return !is_admin_role(role_name);
        };
        if !self.accepts_path(path) {
            return true;
        }

        match permissions.lookup(path) {
            TreeLookup::Miss | TreeLookup::Group(_) => false,
            TreeLookup::Controls(controls) => {
                controls.get(CONTROL_HIDE).copied().unwrap_or(false)
            }
        }
    }

    fn accepts_path(&self, path: &str) -> bool {
        if self.structure.contains_node(path) {
            return true;
        }

        warn!(
            path,
            strict = self.strict_paths,
            "permission path is not declared in the module structure"
        );
        !self.strict_paths
    }
}
