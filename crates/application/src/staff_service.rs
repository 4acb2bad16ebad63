use std::sync::Arc;

use estatery_core::{AppError, AppResult, RecordId, StaffIdentity};
use estatery_domain::{CONTROL_ADD, CONTROL_VIEW, Staff};
use tracing::info;

use crate::AuthorizationService;
use crate::ports::{AuditAction, AuditEvent, AuditRepository, RoleRepository, StaffRepository};

const STAFFS_PATH: &str = "menuStaffs.staffs";

/// Input payload for staff creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStaffInput {
    /// Display name.
    pub display_name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Name of an existing role.
    pub role_name: String,
}

/// Application service for staff administration and identity lookup.
#[derive(Clone)]
pub struct StaffService {
    repository: Arc<dyn StaffRepository>,
    role_repository: Arc<dyn RoleRepository>,
    authorization_service: AuthorizationService,
    audit_repository: Arc<dyn AuditRepository>,
}

impl StaffService {
    /// Creates a new staff service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn StaffRepository>,
        role_repository: Arc<dyn RoleRepository>,
        authorization_service: AuthorizationService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            role_repository,
            authorization_service,
            audit_repository,
        }
    }

    /// Lists staff members.
    pub async fn list_staff(&self, actor: &StaffIdentity) -> AppResult<Vec<Staff>> {
        self.authorization_service
            .require(actor, STAFFS_PATH, CONTROL_VIEW)
            .await?;
        self.repository.list_staff().await
    }

    /// Creates a staff member assigned to an existing role.
    pub async fn create_staff(
        &self,
        actor: &StaffIdentity,
        input: CreateStaffInput,
    ) -> AppResult<Staff> {
        self.authorization_service
            .require(actor, STAFFS_PATH, CONTROL_ADD)
            .await?;

        let role = self
            .role_repository
            .find_role_by_name(&input.role_name)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("role '{}' does not exist", input.role_name.trim()))
            })?;

        let staff = Staff::new(
            RecordId::new(),
            input.display_name,
            input.email,
            role.name().as_str(),
        )?;
        self.repository.save_staff(staff.clone()).await?;
        info!(staff_id = %staff.staff_id(), role = role.name().as_str(), "staff created");

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject(),
                action: AuditAction::StaffCreated,
                resource_type: "staff".to_owned(),
                resource_id: staff.staff_id().to_string(),
                detail: Some(format!(
                    "created '{}' with role '{}'",
                    staff.display_name(),
                    staff.role_name()
                )),
            })
            .await?;

        Ok(staff)
    }

    /// Resolves a request identity. Not permission-gated.
    pub async fn find_identity(&self, staff_id: RecordId) -> AppResult<Option<StaffIdentity>> {
        Ok(self
            .repository
            .find_staff(staff_id)
            .await?
            .map(|staff| staff.identity()))
    }
}
