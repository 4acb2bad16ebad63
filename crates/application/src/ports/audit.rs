use async_trait::async_trait;
use estatery_core::AppResult;

/// Stable audit action identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    /// A role was created.
    RoleCreated,
    /// A role was updated.
    RoleUpdated,
    /// A role was deleted.
    RoleDeleted,
    /// A single permission control was toggled.
    RolePermissionChanged,
    /// A staff member was created.
    StaffCreated,
    /// A bulk upload was validated without side effects.
    BulkUploadValidated,
    /// A bulk upload persisted listings.
    BulkUploadCommitted,
}

impl AuditAction {
    /// Returns the storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleCreated => "role.created",
            Self::RoleUpdated => "role.updated",
            Self::RoleDeleted => "role.deleted",
            Self::RolePermissionChanged => "role.permission_changed",
            Self::StaffCreated => "staff.created",
            Self::BulkUploadValidated => "properties.bulk_upload.validated",
            Self::BulkUploadCommitted => "properties.bulk_upload.committed",
        }
    }
}

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Subject that performed the action.
    pub subject: String,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
