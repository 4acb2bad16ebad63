use std::sync::Arc;

use estatery_core::{AppError, AppResult, StaffIdentity};
use estatery_domain::{
    CONTROL_BULK_UPLOAD, CONTROL_VIEW, ImportSchema, PropertyListing, TransactionType,
    render_template, validate_file,
};
use tracing::info;

use crate::AuthorizationService;
use crate::ports::{AuditAction, AuditEvent, AuditRepository, BulkUploadResult, PropertyRepository};

/// Default upper bound for an uploaded CSV payload.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Authoritative two-phase bulk listing import.
///
/// Both phases run the full validation on the submitted text. A commit
/// persists exactly the rows that validation accepts in that same call.
#[derive(Clone)]
pub struct BulkImportService {
    property_repository: Arc<dyn PropertyRepository>,
    authorization_service: AuthorizationService,
    audit_repository: Arc<dyn AuditRepository>,
    max_upload_bytes: usize,
}

impl BulkImportService {
    /// Creates a new bulk import service.
    #[must_use]
    pub fn new(
        property_repository: Arc<dyn PropertyRepository>,
        authorization_service: AuthorizationService,
        audit_repository: Arc<dyn AuditRepository>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            property_repository,
            authorization_service,
            audit_repository,
            max_upload_bytes,
        }
    }

    /// Validates an upload and, unless `validate_only`, persists its valid rows.
    pub async fn upload(
        &self,
        actor: &StaffIdentity,
        csv_text: &str,
        transaction_type: TransactionType,
        validate_only: bool,
    ) -> AppResult<BulkUploadResult> {
        self.authorization_service
            .require(
                actor,
                transaction_type.permission_path(),
                CONTROL_BULK_UPLOAD,
            )
            .await?;

        if csv_text.len() > self.max_upload_bytes {
            return Err(AppError::Validation(format!(
                "csv payload of {} bytes exceeds the {} byte limit",
                csv_text.len(),
                self.max_upload_bytes
            )));
        }

        let schema = ImportSchema::for_transaction(transaction_type);
        let validated = validate_file(csv_text, &schema)?;
        let report = validated.report.clone();

        if validate_only {
            info!(
                transaction_type = transaction_type.as_str(),
                total = report.total,
                successful = report.successful,
                failed = report.failed,
                "bulk upload validated"
            );
            self.audit(
                actor,
                AuditAction::BulkUploadValidated,
                transaction_type,
                format!(
                    "validated {} row(s): {} valid, {} invalid",
                    report.total, report.successful, report.failed
                ),
            )
            .await?;

            return Ok(BulkUploadResult {
                report,
                successful_properties: Vec::new(),
            });
        }

        let listings: Vec<PropertyListing> = validated
            .valid_rows()
            .map(|row| PropertyListing::from_import_row(transaction_type, row))
            .collect();
        let successful_properties = listings
            .iter()
            .map(|listing| listing.listing_id().to_string())
            .collect::<Vec<_>>();

        if !listings.is_empty() {
            self.property_repository.save_listings(listings).await?;
        }

        info!(
            transaction_type = transaction_type.as_str(),
            created = successful_properties.len(),
            skipped = report.failed,
            "bulk upload committed"
        );
        self.audit(
            actor,
            AuditAction::BulkUploadCommitted,
            transaction_type,
            format!(
                "created {} listing(s), skipped {} invalid row(s)",
                successful_properties.len(),
                report.failed
            ),
        )
        .await?;

        Ok(BulkUploadResult {
            report,
            successful_properties,
        })
    }

    /// Renders the downloadable CSV template for a transaction type.
    #[must_use]
    pub fn template(&self, transaction_type: TransactionType) -> String {
        render_template(&ImportSchema::for_transaction(transaction_type))
    }

    /// Lists imported listings the actor may view.
    pub async fn list_listings(
        &self,
        actor: &StaffIdentity,
        transaction_type: Option<TransactionType>,
    ) -> AppResult<Vec<PropertyListing>> {
        if let Some(transaction_type) = transaction_type {
            self.authorization_service
                .require(actor, transaction_type.permission_path(), CONTROL_VIEW)
                .await?;
            return self
                .property_repository
                .list_listings(Some(transaction_type))
                .await;
        }

        let resolver = self.authorization_service.resolver_for(actor).await?;
        let visible: Vec<TransactionType> = TransactionType::all()
            .iter()
            .copied()
            .filter(|transaction_type| {
                resolver.can(transaction_type.permission_path(), CONTROL_VIEW)
            })
            .collect();
        if visible.is_empty() {
            return Err(AppError::Forbidden(format!(
                "staff '{}' cannot view any property listings",
                actor.subject()
            )));
        }

        let listings = self.property_repository.list_listings(None).await?;
        Ok(listings
            .into_iter()
            .filter(|listing| visible.contains(&listing.transaction_type()))
            .collect())
    }

    async fn audit(
        &self,
        actor: &StaffIdentity,
        action: AuditAction,
        transaction_type: TransactionType,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject(),
                action,
                resource_type: "property_bulk_upload".to_owned(),
                resource_id: transaction_type.as_str().to_owned(),
                detail: Some(detail),
            })
            .await
    }
}

#[cfg(test)]
mod tests;
