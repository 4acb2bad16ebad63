use std::sync::Arc;

use estatery_core::{AppError, AppResult};
use estatery_domain::{
    ImportSchema, TransactionType, ValidatedImport, ValidationOutcome, ValidationReport, parse,
    validate_file, validate_header,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::ports::{BulkUploadGateway, BulkUploadResult};

/// Phase of a client-side import session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportState {
    /// No validation has run for the selected file.
    Idle,
    /// Phase 1 is in flight.
    Validating,
    /// Every row passed phase 1.
    AllValid,
    /// Some rows passed phase 1.
    PartiallyValid,
    /// No row passed phase 1.
    AllInvalid,
    /// Phase 2 is in flight.
    Committing,
    /// Phase 2 completed. Only `reset` leaves this state.
    Committed,
}

impl ImportState {
    fn is_in_flight(self) -> bool {
        matches!(self, Self::Validating | Self::Committing)
    }

    fn accepts_file(self) -> bool {
        matches!(
            self,
            Self::Idle | Self::AllValid | Self::PartiallyValid | Self::AllInvalid
        )
    }

    fn is_committable(self) -> bool {
        matches!(self, Self::AllValid | Self::PartiallyValid)
    }
}

impl From<ValidationOutcome> for ImportState {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::AllValid => Self::AllValid,
            ValidationOutcome::PartiallyValid => Self::PartiallyValid,
            ValidationOutcome::AllInvalid => Self::AllInvalid,
        }
    }
}

#[derive(Debug)]
struct SessionState {
    phase: ImportState,
    transaction_type: TransactionType,
    csv_text: Option<String>,
    report: Option<ValidationReport>,
    committed: Option<BulkUploadResult>,
}

/// Client-side driver for the two-phase bulk upload.
///
/// The backend report is authoritative. [`Self::preview`] runs the same
/// validation locally for display only.
pub struct BulkImportSession {
    gateway: Arc<dyn BulkUploadGateway>,
    state: Mutex<SessionState>,
}

impl BulkImportSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new(gateway: Arc<dyn BulkUploadGateway>, transaction_type: TransactionType) -> Self {
        Self {
            gateway,
            state: Mutex::new(SessionState {
                phase: ImportState::Idle,
                transaction_type,
                csv_text: None,
                report: None,
                committed: None,
            }),
        }
    }

    /// Returns the current phase.
    pub async fn state(&self) -> ImportState {
        self.state.lock().await.phase
    }

    /// Returns the latest authoritative report.
    pub async fn report(&self) -> Option<ValidationReport> {
        self.state.lock().await.report.clone()
    }

    /// Returns the commit result once the session is committed.
    pub async fn committed(&self) -> Option<BulkUploadResult> {
        self.state.lock().await.committed.clone()
    }

    /// Selects the file to import, discarding any earlier report.
    pub async fn select_file(
        &self,
        csv_text: impl Into<String>,
        transaction_type: TransactionType,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.phase.accepts_file() {
            return Err(busy_or_finished(state.phase));
        }

        state.phase = ImportState::Idle;
        state.transaction_type = transaction_type;
        state.csv_text = Some(csv_text.into());
        state.report = None;
        Ok(())
    }

    /// Validates the selected file locally without contacting the backend.
    pub async fn preview(&self) -> AppResult<ValidatedImport> {
        let (csv_text, transaction_type) = {
            let state = self.state.lock().await;
            (selected_file(&state)?, state.transaction_type)
        };

        validate_file(&csv_text, &ImportSchema::for_transaction(transaction_type))
    }

    /// Runs phase 1 on the backend.
    ///
    /// A header that lacks mandatory columns is rejected locally and the
    /// backend is not contacted.
    pub async fn validate(&self) -> AppResult<ValidationReport> {
        let (csv_text, transaction_type, prior_phase) = {
            let mut state = self.state.lock().await;
            if !state.phase.accepts_file() {
                return Err(busy_or_finished(state.phase));
            }
            let csv_text = selected_file(&state)?;
            let schema = ImportSchema::for_transaction(state.transaction_type);

            let parsed = parse(&csv_text, &schema)?;
            if let Some(header_error) = validate_header(&parsed.raw_header, &schema) {
                debug!(message = %header_error.message, "header rejected before upload");
                let report = ValidationReport::rejected_header(header_error);
                state.phase = ImportState::AllInvalid;
                state.report = Some(report.clone());
                return Ok(report);
            }

            let prior_phase = state.phase;
            state.phase = ImportState::Validating;
            (csv_text, state.transaction_type, prior_phase)
        };

        let result = self
            .gateway
            .upload(&csv_text, transaction_type, true)
            .await;

        let mut state = self.state.lock().await;
        match result {
            Ok(result) => {
                state.phase = ImportState::from(result.report.outcome());
                state.report = Some(result.report.clone());
                Ok(result.report)
            }
            Err(error) => {
                warn!(%error, "bulk upload validation failed");
                state.phase = prior_phase;
                Err(error)
            }
        }
    }

    /// Runs phase 2 on the backend with the full original file.
    pub async fn commit(&self) -> AppResult<BulkUploadResult> {
        let (csv_text, transaction_type, prior_phase) = {
            let mut state = self.state.lock().await;
            if !state.phase.is_committable() {
                return Err(match state.phase {
                    ImportState::Validating | ImportState::Committing | ImportState::Committed => {
                        busy_or_finished(state.phase)
                    }
                    _ => AppError::Validation(
                        "validate the file and fix every error before importing".to_owned(),
                    ),
                });
            }

            let csv_text = selected_file(&state)?;
            let prior_phase = state.phase;
            state.phase = ImportState::Committing;
            (csv_text, state.transaction_type, prior_phase)
        };

        let result = self
            .gateway
            .upload(&csv_text, transaction_type, false)
            .await;

        let mut state = self.state.lock().await;
        match result {
            Ok(result) => {
                state.phase = ImportState::Committed;
                state.report = Some(result.report.clone());
                state.committed = Some(result.clone());
                Ok(result)
            }
            Err(error) => {
                warn!(%error, "bulk upload commit failed");
                state.phase = prior_phase;
                Err(error)
            }
        }
    }

    /// Returns the session to `Idle` and forgets the selected file.
    pub async fn reset(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.phase.is_in_flight() {
            return Err(busy_or_finished(state.phase));
        }

        state.phase = ImportState::Idle;
        state.csv_text = None;
        state.report = None;
        state.committed = None;
        Ok(())
    }
}

fn selected_file(state: &SessionState) -> AppResult<String> {
    state
        .csv_text
        .clone()
        .ok_or_else(|| AppError::Validation("select a csv file first".to_owned()))
}

fn busy_or_finished(phase: ImportState) -> AppError {
    if phase == ImportState::Committed {
        AppError::Conflict("import already committed; reset before starting another".to_owned())
    } else {
        AppError::Conflict("an upload is already in progress".to_owned())
    }
}

#[cfg(test)]
mod tests;
