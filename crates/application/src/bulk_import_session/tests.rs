use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use estatery_core::{AppError, AppResult};
use estatery_domain::{ImportSchema, TransactionType, render_template, validate_file};

use crate::ports::{BulkUploadGateway, BulkUploadResult};

use super::{BulkImportSession, ImportState};

#[derive(Default)]
struct FakeGateway {
    calls: Mutex<Vec<(String, bool)>>,
    fail_next: Mutex<Option<AppError>>,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl BulkUploadGateway for FakeGateway {
    async fn upload(
        &self,
        csv_text: &str,
        transaction_type: TransactionType,
        validate_only: bool,
    ) -> AppResult<BulkUploadResult> {
        self.calls
            .lock()
            .await
            .push((csv_text.to_owned(), validate_only));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(error) = self.fail_next.lock().await.take() {
            return Err(error);
        }

        let validated = validate_file(csv_text, &ImportSchema::for_transaction(transaction_type))?;
        let successful_properties = if validate_only {
            Vec::new()
        } else {
            validated
                .valid_rows()
                .map(|row| format!("listing-{}", row.row_number))
                .collect()
        };
        Ok(BulkUploadResult {
            report: validated.report,
            successful_properties,
        })
    }
}

fn lease_csv(rows: &[&str]) -> String {
    let template = render_template(&ImportSchema::for_transaction(TransactionType::Lease));
    let mut text = template.lines().next().unwrap_or_default().to_owned();
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

#[tokio::test]
async fn partially_valid_file_commits_the_full_original_text() {
    let gateway = Arc::new(FakeGateway::default());
    let session = BulkImportSession::new(gateway.clone(), TransactionType::Lease);
    let csv = lease_csv(&["P,,A,,B", ",,A,,B", "P,,A,,B"]);

    assert!(session.select_file(csv.clone(), TransactionType::Lease).await.is_ok());
    let report = session.validate().await;
    assert_eq!(report.map(|report| report.successful).ok(), Some(2));
    assert_eq!(session.state().await, ImportState::PartiallyValid);

    let committed = session.commit().await;
    assert_eq!(
        committed.map(|result| result.successful_properties).ok(),
        Some(vec!["listing-2".to_owned(), "listing-4".to_owned()])
    );
    assert_eq!(session.state().await, ImportState::Committed);

    let calls = gateway.calls.lock().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], (csv, false));
}

#[tokio::test]
async fn all_invalid_file_cannot_be_committed() {
    let gateway = Arc::new(FakeGateway::default());
    let session = BulkImportSession::new(gateway, TransactionType::Lease);

    assert!(
        session
            .select_file(lease_csv(&[",,A,,B"]), TransactionType::Lease)
            .await
            .is_ok()
    );
    assert!(session.validate().await.is_ok());
    assert_eq!(session.state().await, ImportState::AllInvalid);

    let commit = session.commit().await;
    assert!(matches!(commit, Err(AppError::Validation(_))));
    assert_eq!(session.state().await, ImportState::AllInvalid);
}

#[tokio::test]
async fn header_problem_is_rejected_without_contacting_backend() {
    let gateway = Arc::new(FakeGateway::default());
    let session = BulkImportSession::new(gateway.clone(), TransactionType::Sale);

    assert!(
        session
            .select_file("Unit Number (EN),Unit Number (VI)\nU1,\n", TransactionType::Sale)
            .await
            .is_ok()
    );
    let report = session.validate().await;
    assert_eq!(report.map(|report| report.is_header_rejection()).ok(), Some(true));
    assert_eq!(session.state().await, ImportState::AllInvalid);
    assert!(gateway.calls.lock().await.is_empty());
}

#[tokio::test]
async fn failed_commit_restores_prior_state() {
    let gateway = Arc::new(FakeGateway::default());
    let session = BulkImportSession::new(gateway.clone(), TransactionType::Lease);
    assert!(
        session
            .select_file(lease_csv(&["P,,A,,B"]), TransactionType::Lease)
            .await
            .is_ok()
    );
    assert!(session.validate().await.is_ok());

    *gateway.fail_next.lock().await = Some(AppError::Upstream("gateway timeout".to_owned()));
    let commit = session.commit().await;

    assert!(matches!(commit, Err(AppError::Upstream(_))));
    assert_eq!(session.state().await, ImportState::AllValid);
    assert!(session.commit().await.is_ok());
}

#[tokio::test]
async fn committed_session_requires_reset() {
    let gateway = Arc::new(FakeGateway::default());
    let session = BulkImportSession::new(gateway, TransactionType::Lease);
    assert!(
        session
            .select_file(lease_csv(&["P,,A,,B"]), TransactionType::Lease)
            .await
            .is_ok()
    );
    assert!(session.validate().await.is_ok());
    assert!(session.commit().await.is_ok());

    let reselect = session
        .select_file(lease_csv(&["Q,,A,,B"]), TransactionType::Lease)
        .await;
    assert!(matches!(reselect, Err(AppError::Conflict(_))));

    assert!(session.reset().await.is_ok());
    assert_eq!(session.state().await, ImportState::Idle);
    assert!(session.committed().await.is_none());
    assert!(matches!(session.validate().await, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn submissions_are_rejected_while_validating() {
    let gate = Arc::new(Notify::new());
    let gateway = Arc::new(FakeGateway {
        gate: Some(gate.clone()),
        ..FakeGateway::default()
    });
    let session = BulkImportSession::new(gateway, TransactionType::Lease);
    assert!(
        session
            .select_file(lease_csv(&["P,,A,,B"]), TransactionType::Lease)
            .await
            .is_ok()
    );

    let (first, second) = tokio::join!(session.validate(), async {
        while session.state().await != ImportState::Validating {
            tokio::task::yield_now().await;
        }
        let second = session.validate().await;
        gate.notify_one();
        second
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(session.state().await, ImportState::AllValid);
}

#[tokio::test]
async fn preview_runs_locally() {
    let gateway = Arc::new(FakeGateway::default());
    let session = BulkImportSession::new(gateway.clone(), TransactionType::Lease);
    assert!(matches!(session.preview().await, Err(AppError::Validation(_))));

    assert!(
        session
            .select_file(lease_csv(&["P,,A,,B,,,,,,abc"]), TransactionType::Lease)
            .await
            .is_ok()
    );
    let preview = session.preview().await;
    assert_eq!(preview.map(|validated| validated.report.failed).ok(), Some(1));
    assert!(gateway.calls.lock().await.is_empty());
    assert_eq!(session.state().await, ImportState::Idle);
}
