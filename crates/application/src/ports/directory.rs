use async_trait::async_trait;
use estatery_core::AppResult;
use estatery_domain::{Role, TransactionType, ValidationReport};

/// Role list as served by the back-office backend.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Fetches every role with its permission tree.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;
}

/// Result of one bulk upload call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkUploadResult {
    /// Authoritative validation report.
    pub report: ValidationReport,
    /// Identifiers of listings created by a commit.
    pub successful_properties: Vec<String>,
}

/// Bulk upload endpoint as seen by an import session.
#[async_trait]
pub trait BulkUploadGateway: Send + Sync {
    /// Submits the full CSV text.
    ///
    /// With `validate_only` the backend reports without persisting.
    async fn upload(
        &self,
        csv_text: &str,
        transaction_type: TransactionType,
        validate_only: bool,
    ) -> AppResult<BulkUploadResult>;
}
