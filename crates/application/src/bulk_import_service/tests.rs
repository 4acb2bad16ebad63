use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use estatery_core::{AppError, AppResult, RecordId, StaffIdentity};
use estatery_domain::{
    CONTROL_BULK_UPLOAD, ImportSchema, ModuleStructure, PermissionPath, PropertyListing, Role,
    RoleStatus, TransactionType, ValidationErrorKind, render_template, role_names_match,
};

use crate::AuthorizationService;
use crate::ports::{AuditAction, AuditEvent, AuditRepository, PropertyRepository, RoleRepository};

use super::BulkImportService;

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Default)]
struct FakePropertyRepository {
    listings: Mutex<Vec<PropertyListing>>,
}

#[async_trait]
impl PropertyRepository for FakePropertyRepository {
    async fn save_listings(&self, listings: Vec<PropertyListing>) -> AppResult<()> {
        self.listings.lock().await.extend(listings);
        Ok(())
    }

    async fn list_listings(
        &self,
        transaction_type: Option<TransactionType>,
    ) -> AppResult<Vec<PropertyListing>> {
        Ok(self
            .listings
            .lock()
            .await
            .iter()
            .filter(|listing| {
                transaction_type.is_none_or(|value| listing.transaction_type() == value)
            })
            .cloned()
            .collect())
    }
}

struct FakeRoleRepository {
    roles: Vec<Role>,
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.clone())
    }

    async fn find_role(&self, role_id: RecordId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .iter()
            .find(|role| role.role_id() == role_id)
            .cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .iter()
            .find(|role| role_names_match(role.name().as_str(), name))
            .cloned())
    }

    async fn save_role(&self, _role: Role) -> AppResult<()> {
        Ok(())
    }

    async fn delete_role(&self, _role_id: RecordId) -> AppResult<()> {
        Ok(())
    }
}

struct Harness {
    service: BulkImportService,
    properties: Arc<FakePropertyRepository>,
    audit: Arc<FakeAuditRepository>,
}

fn lease_uploader_role() -> Role {
    let structure = ModuleStructure::standard();
    let mut role = match Role::new("Lease Uploader", RoleStatus::Active, false, structure) {
        Ok(role) => role,
        Err(error) => panic!("invalid test role: {error}"),
    };
    let lease = match PermissionPath::parse(structure, "properties.lease") {
        Ok(path) => path,
        Err(error) => panic!("invalid test path: {error}"),
    };
    assert!(
        role.permissions_mut()
            .set_control(structure, &lease, CONTROL_BULK_UPLOAD, true)
            .is_ok()
    );
    role
}

fn harness(max_upload_bytes: usize) -> Harness {
    let roles = Arc::new(FakeRoleRepository {
        roles: vec![lease_uploader_role()],
    });
    let properties = Arc::new(FakePropertyRepository::default());
    let audit = Arc::new(FakeAuditRepository::default());
    let authorization = AuthorizationService::new(roles, ModuleStructure::standard(), false);

    Harness {
        service: BulkImportService::new(
            properties.clone(),
            authorization,
            audit.clone(),
            max_upload_bytes,
        ),
        properties,
        audit,
    }
}

fn super_admin() -> StaffIdentity {
    StaffIdentity::new(RecordId::new(), "Owner", "Super Admin")
}

fn lease_csv_with_failures(failing_rows: &[usize]) -> String {
    let template = render_template(&ImportSchema::for_transaction(TransactionType::Lease));
    let mut text = template.lines().next().unwrap_or_default().to_owned();
    text.push('\n');

    for row_number in 2..12 {
        let project = if failing_rows.contains(&row_number) {
            String::new()
        } else {
            format!("Project {row_number}")
        };
        text.push_str(&format!(
            "{project},,Zone {row_number},,Block {row_number},,U{row_number},,Apartment,Căn hộ,2\n"
        ));
    }
    text
}

#[tokio::test]
async fn validate_then_commit_persists_exactly_the_valid_rows() {
    let harness = harness(1024 * 1024);
    let actor = super_admin();
    let csv = lease_csv_with_failures(&[3, 7]);

    let Ok(phase_one) = harness
        .service
        .upload(&actor, &csv, TransactionType::Lease, true)
        .await
    else {
        panic!("validation should succeed");
    };
    assert_eq!(phase_one.report.total, 10);
    assert_eq!(phase_one.report.successful, 8);
    assert_eq!(phase_one.report.failed, 2);
    assert!(phase_one.successful_properties.is_empty());
    assert!(harness.properties.listings.lock().await.is_empty());
    assert!(
        phase_one
            .report
            .errors
            .iter()
            .all(|error| error.kind == ValidationErrorKind::MissingFields
                && (error.row_number == 3 || error.row_number == 7))
    );

    let Ok(phase_two) = harness
        .service
        .upload(&actor, &csv, TransactionType::Lease, false)
        .await
    else {
        panic!("commit should succeed");
    };
    assert_eq!(phase_two.successful_properties.len(), 8);

    let listings = harness.properties.listings.lock().await;
    assert_eq!(listings.len(), 8);
    assert!(
        listings
            .iter()
            .all(|listing| listing.source_row() != 3 && listing.source_row() != 7)
    );

    let events = harness.audit.events.lock().await;
    assert_eq!(
        events.iter().map(|event| event.action).collect::<Vec<_>>(),
        vec![
            AuditAction::BulkUploadValidated,
            AuditAction::BulkUploadCommitted
        ]
    );
}

#[tokio::test]
async fn validation_is_idempotent() {
    let harness = harness(1024 * 1024);
    let actor = super_admin();
    let csv = lease_csv_with_failures(&[4]);

    let first = harness
        .service
        .upload(&actor, &csv, TransactionType::Lease, true)
        .await;
    let second = harness
        .service
        .upload(&actor, &csv, TransactionType::Lease, true)
        .await;

    assert!(first.is_ok());
    assert_eq!(first, second);
}

#[tokio::test]
async fn upload_requires_bulk_upload_on_the_transaction_type() {
    let harness = harness(1024 * 1024);
    let uploader = StaffIdentity::new(RecordId::new(), "Lan", "lease uploader");
    let csv = lease_csv_with_failures(&[]);

    let lease = harness
        .service
        .upload(&uploader, &csv, TransactionType::Lease, true)
        .await;
    assert!(lease.is_ok());

    let sale = harness
        .service
        .upload(&uploader, &csv, TransactionType::Sale, true)
        .await;
    assert!(matches!(sale, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn oversized_payload_is_rejected() {
    let harness = harness(64);
    let csv = lease_csv_with_failures(&[]);

    let result = harness
        .service
        .upload(&super_admin(), &csv, TransactionType::Lease, true)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn header_rejection_commits_nothing() {
    let harness = harness(1024 * 1024);
    let csv = "Project / Community (EN),Project / Community (VI),Area / Zone (EN),Area / Zone (VI)\nP,,A,\n";

    let Ok(result) = harness
        .service
        .upload(&super_admin(), csv, TransactionType::Sale, false)
        .await
    else {
        panic!("a header rejection is a report, not an error");
    };
    assert_eq!(result.report.total, 0);
    assert_eq!(result.report.errors.len(), 1);
    assert_eq!(result.report.errors[0].row_number, 1);
    assert!(result.successful_properties.is_empty());
    assert!(harness.properties.listings.lock().await.is_empty());
}

#[tokio::test]
async fn listings_are_filtered_by_view_permission() {
    let harness = harness(1024 * 1024);
    let owner = super_admin();
    let csv = lease_csv_with_failures(&[]);
    assert!(
        harness
            .service
            .upload(&owner, &csv, TransactionType::Lease, false)
            .await
            .is_ok()
    );

    let all = harness.service.list_listings(&owner, None).await;
    assert_eq!(all.map(|listings| listings.len()).ok(), Some(10));

    let uploader = StaffIdentity::new(RecordId::new(), "Lan", "Lease Uploader");
    let denied = harness.service.list_listings(&uploader, None).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
}

#[test]
fn template_matches_schema_columns() {
    let harness = harness(1024);
    let template = harness.service.template(TransactionType::Homestay);
    let header = template.lines().next().unwrap_or_default();

    assert_eq!(
        header.split(',').count(),
        ImportSchema::for_transaction(TransactionType::Homestay).column_count()
    );
}
