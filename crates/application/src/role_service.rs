use std::sync::Arc;

use estatery_core::{AppError, AppResult, RecordId, StaffIdentity};
use estatery_domain::{
    CONTROL_ADD, CONTROL_DELETE, CONTROL_EDIT, CONTROL_VIEW, PermissionPath, PermissionTree, Role,
    RoleStatus, is_super_admin_role,
};
use serde_json::Value;
use tracing::info;

use crate::AuthorizationService;
use crate::ports::{AuditAction, AuditEvent, AuditRepository, RoleRepository, StaffRepository};

const ROLES_PATH: &str = "menuStaffs.roles";

/// Input payload for role creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Initial status.
    pub status: RoleStatus,
    /// Approver marker.
    pub is_approver: bool,
}

/// Input payload for role updates. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRoleInput {
    /// New role name.
    pub name: Option<String>,
    /// New status.
    pub status: Option<RoleStatus>,
    /// New approver marker.
    pub is_approver: Option<bool>,
    /// Replacement tree in its stored, loosely typed form.
    pub permissions: Option<Value>,
}

/// Application service for role administration.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
    staff_repository: Arc<dyn StaffRepository>,
    authorization_service: AuthorizationService,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RoleRepository>,
        staff_repository: Arc<dyn StaffRepository>,
        authorization_service: AuthorizationService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            staff_repository,
            authorization_service,
            audit_repository,
        }
    }

    /// Lists every role.
    pub async fn list_roles(&self, actor: &StaffIdentity) -> AppResult<Vec<Role>> {
        self.authorization_service
            .require(actor, ROLES_PATH, CONTROL_VIEW)
            .await?;
        self.repository.list_roles().await
    }

    /// Returns one role.
    pub async fn get_role(&self, actor: &StaffIdentity, role_id: RecordId) -> AppResult<Role> {
        self.authorization_service
            .require(actor, ROLES_PATH, CONTROL_VIEW)
            .await?;
        self.load_role(role_id).await
    }

    /// Creates a role with the all-hidden skeleton tree.
    pub async fn create_role(
        &self,
        actor: &StaffIdentity,
        input: CreateRoleInput,
    ) -> AppResult<Role> {
        self.authorization_service
            .require(actor, ROLES_PATH, CONTROL_ADD)
            .await?;

        if is_super_admin_role(&input.name) {
            return Err(AppError::Conflict(
                "the super admin role name is reserved".to_owned(),
            ));
        }

        let role = Role::new(
            input.name,
            input.status,
            input.is_approver,
            self.authorization_service.structure(),
        )?;
        self.ensure_name_available(role.name().as_str(), None)
            .await?;
        self.repository.save_role(role.clone()).await?;

        info!(role_id = %role.role_id(), role = role.name().as_str(), "role created");
        self.audit(actor, AuditAction::RoleCreated, &role, None)
            .await?;

        Ok(role)
    }

    /// Updates name, status, approver marker or tree of a role.
    pub async fn update_role(
        &self,
        actor: &StaffIdentity,
        role_id: RecordId,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        self.authorization_service
            .require(actor, ROLES_PATH, CONTROL_EDIT)
            .await?;

        let mut role = self.load_role(role_id).await?;
        let previous_name = role.name().as_str().to_owned();

        if let Some(name) = input.name {
            role.rename(name)?;
            if is_super_admin_role(&previous_name) != role.is_super_admin() {
                return Err(AppError::Conflict(
                    "the super admin role name is reserved".to_owned(),
                ));
            }
            self.ensure_name_available(role.name().as_str(), Some(role_id))
                .await?;
        }
        if let Some(status) = input.status {
            role.set_status(status);
        }
        if let Some(is_approver) = input.is_approver {
            role.set_approver(is_approver);
        }
        if let Some(permissions) = input.permissions {
            let structure = self.authorization_service.structure();
            role.replace_permissions(
                PermissionTree::from_loose_value(structure, &permissions),
                structure,
            );
        }

        self.repository.save_role(role.clone()).await?;

        if previous_name != role.name().as_str() {
            let moved = self
                .staff_repository
                .reassign_role(&previous_name, role.name().as_str())
                .await?;
            info!(
                role_id = %role_id,
                from = %previous_name,
                to = role.name().as_str(),
                moved,
                "role renamed"
            );
        }

        self.audit(actor, AuditAction::RoleUpdated, &role, None)
            .await?;

        Ok(role)
    }

    /// Deletes a role that is neither protected nor assigned.
    pub async fn delete_role(&self, actor: &StaffIdentity, role_id: RecordId) -> AppResult<()> {
        self.authorization_service
            .require(actor, ROLES_PATH, CONTROL_DELETE)
            .await?;

        let role = self.load_role(role_id).await?;
        if role.is_super_admin() {
            return Err(AppError::Conflict(
                "the super admin role cannot be deleted".to_owned(),
            ));
        }

        let assigned = self
            .staff_repository
            .count_with_role(role.name().as_str())
            .await?;
        if assigned > 0 {
            return Err(AppError::Conflict(format!(
                "role '{}' is assigned to {assigned} staff member(s)",
                role.name()
            )));
        }

        self.repository.delete_role(role_id).await?;
        self.audit(actor, AuditAction::RoleDeleted, &role, None)
            .await
    }

    /// Sets one control on one node of a role's tree.
    pub async fn set_control(
        &self,
        actor: &StaffIdentity,
        role_id: RecordId,
        path: &str,
        control: &str,
        value: bool,
    ) -> AppResult<Role> {
        self.authorization_service
            .require(actor, ROLES_PATH, CONTROL_EDIT)
            .await?;

        let structure = self.authorization_service.structure();
        let path = PermissionPath::parse(structure, path)?;
        let mut role = self.load_role(role_id).await?;
        role.permissions_mut()
            .set_control(structure, &path, control, value)?;
        self.repository.save_role(role.clone()).await?;

        self.audit(
            actor,
            AuditAction::RolePermissionChanged,
            &role,
            Some(format!("{path}.{control} = {value}")),
        )
        .await?;

        Ok(role)
    }

    /// Sets the UI-facing access toggle, stored as the inverse `hide` flag.
    pub async fn set_access(
        &self,
        actor: &StaffIdentity,
        role_id: RecordId,
        path: &str,
        enabled: bool,
    ) -> AppResult<Role> {
        self.authorization_service
            .require(actor, ROLES_PATH, CONTROL_EDIT)
            .await?;

        let structure = self.authorization_service.structure();
        let path = PermissionPath::parse(structure, path)?;
        let mut role = self.load_role(role_id).await?;
        role.permissions_mut().set_access(structure, &path, enabled)?;
        self.repository.save_role(role.clone()).await?;

        self.audit(
            actor,
            AuditAction::RolePermissionChanged,
            &role,
            Some(format!("{path} access = {enabled}")),
        )
        .await?;

        Ok(role)
    }

    async fn load_role(&self, role_id: RecordId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn ensure_name_available(&self, name: &str, own_id: Option<RecordId>) -> AppResult<()> {
        match self.repository.find_role_by_name(name).await? {
            Some(existing) if Some(existing.role_id()) != own_id => Err(AppError::Conflict(
                format!("role '{name}' already exists"),
            )),
            _ => Ok(()),
        }
    }

    async fn audit(
        &self,
        actor: &StaffIdentity,
        action: AuditAction,
        role: &Role,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject(),
                action,
                resource_type: "role".to_owned(),
                resource_id: role.role_id().to_string(),
                detail: detail.or_else(|| Some(format!("role '{}'", role.name()))),
            })
            .await
    }
}
