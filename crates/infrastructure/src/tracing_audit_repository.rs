use async_trait::async_trait;
use estatery_application::{AuditEvent, AuditRepository};
use estatery_core::AppResult;
use tracing::info;

/// Audit sink that writes events to the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditRepository;

#[async_trait]
impl AuditRepository for TracingAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            target: "audit",
            subject = %event.subject,
            action = event.action.as_str(),
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            detail = event.detail.as_deref().unwrap_or_default(),
            "audit event"
        );
        Ok(())
    }
}
