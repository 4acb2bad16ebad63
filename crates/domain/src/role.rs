use std::str::FromStr;

use estatery_core::{AppError, AppResult, NonEmptyString, RecordId};
use serde::{Deserialize, Serialize};

use crate::permission::{ModuleStructure, PermissionTree};

/// Name of the role that bypasses every permission check.
pub const SUPER_ADMIN_ROLE_NAME: &str = "Super Admin";

/// Name of the built-in admin role allowed through before roles are synced.
pub const ADMIN_ROLE_NAME: &str = "admin";

/// Normalizes a role name for comparisons: trimmed, lowercase, single spaces.
#[must_use]
pub fn normalize_role_name(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns whether two role names refer to the same role.
#[must_use]
pub fn role_names_match(left: &str, right: &str) -> bool {
    normalize_role_name(left) == normalize_role_name(right)
}

/// Returns whether the name designates the super admin role.
#[must_use]
pub fn is_super_admin_role(name: &str) -> bool {
    role_names_match(name, SUPER_ADMIN_ROLE_NAME)
}

/// Returns whether the name designates the built-in admin role.
#[must_use]
pub fn is_admin_role(name: &str) -> bool {
    role_names_match(name, ADMIN_ROLE_NAME)
}

/// Lifecycle status of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleStatus {
    /// Role can be assigned and used.
    Active,
    /// Role is kept but disabled.
    Inactive,
}

impl RoleStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl FromStr for RoleStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown role status '{value}'"
            ))),
        }
    }
}

/// Back-office role with its permission tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    role_id: RecordId,
    name: NonEmptyString,
    status: RoleStatus,
    is_approver: bool,
    permissions: PermissionTree,
}

impl Role {
    /// Creates a role with the all-hidden skeleton tree.
    pub fn new(
        name: impl Into<String>,
        status: RoleStatus,
        is_approver: bool,
        structure: &ModuleStructure,
    ) -> AppResult<Self> {
        Ok(Self {
            role_id: RecordId::new(),
            name: NonEmptyString::trimmed(name)?,
            status,
            is_approver,
            permissions: PermissionTree::skeleton(structure),
        })
    }

    /// Rebuilds a persisted role, backfilling its tree against the structure.
    pub fn restore(
        role_id: RecordId,
        name: impl Into<String>,
        status: RoleStatus,
        is_approver: bool,
        permissions: PermissionTree,
        structure: &ModuleStructure,
    ) -> AppResult<Self> {
        Ok(Self {
            role_id,
            name: NonEmptyString::trimmed(name)?,
            status,
            is_approver,
            permissions: permissions.backfilled(structure),
        })
    }

    /// Returns the stable role identifier.
    #[must_use]
    pub fn role_id(&self) -> RecordId {
        self.role_id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the role status.
    #[must_use]
    pub fn status(&self) -> RoleStatus {
        self.status
    }

    /// Returns whether members of this role approve listings.
    #[must_use]
    pub fn is_approver(&self) -> bool {
        self.is_approver
    }

    /// Returns the role permission tree.
    #[must_use]
    pub fn permissions(&self) -> &PermissionTree {
        &self.permissions
    }

    /// Returns the mutable permission tree for toggle operations.
    pub fn permissions_mut(&mut self) -> &mut PermissionTree {
        &mut self.permissions
    }

    /// Returns whether this is the protected super admin role.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        is_super_admin_role(self.name.as_str())
    }

    /// Renames the role.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::trimmed(name)?;
        Ok(())
    }

    /// Updates the role status.
    pub fn set_status(&mut self, status: RoleStatus) {
        self.status = status;
    }

    /// Updates the approver flag.
    pub fn set_approver(&mut self, is_approver: bool) {
        self.is_approver = is_approver;
    }

    /// Replaces the tree, backfilling it against the structure.
    pub fn replace_permissions(&mut self, permissions: PermissionTree, structure: &ModuleStructure) {
        self.permissions = permissions.backfilled(structure);
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::permission::ModuleStructure;

    use super::{Role, RoleStatus, is_admin_role, is_super_admin_role, normalize_role_name};

    #[test]
    fn role_names_normalize_case_and_whitespace() {
        assert_eq!(normalize_role_name("  Super   ADMIN "), "super admin");
        assert!(is_super_admin_role("super admin"));
        assert!(is_super_admin_role("\tSUPER ADMIN\n"));
        assert!(!is_super_admin_role("superadmin"));
        assert!(is_admin_role(" Admin "));
        assert!(!is_admin_role("administrator"));
    }

    #[test]
    fn role_status_parses_case_insensitively() {
        assert_eq!(RoleStatus::from_str("inactive").ok(), Some(RoleStatus::Inactive));
        assert!(RoleStatus::from_str("archived").is_err());
    }

    #[test]
    fn new_role_rejects_blank_name_and_trims() {
        let structure = ModuleStructure::standard();
        assert!(Role::new("   ", RoleStatus::Active, false, structure).is_err());

        let role = Role::new("  Listing Agent ", RoleStatus::Active, true, structure);
        assert_eq!(
            role.map(|role| role.name().as_str().to_owned()).ok().as_deref(),
            Some("Listing Agent")
        );
    }
}
