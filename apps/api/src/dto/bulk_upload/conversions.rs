use estatery_application::BulkUploadResult;
use estatery_domain::RowValidationError;

use super::{BulkUploadDataResponse, BulkUploadResponse, FieldErrorResponse, RowErrorsResponse};

impl BulkUploadResponse {
    /// Wraps a result; created ids are only sent back for commits.
    pub fn from_result(result: BulkUploadResult, committed: bool) -> Self {
        let report = result.report;
        let errors = report
            .errors_by_row()
            .into_iter()
            .map(|(row, errors)| RowErrorsResponse {
                row,
                errors: errors.into_iter().map(FieldErrorResponse::from).collect(),
            })
            .collect();

        Self {
            success: true,
            data: BulkUploadDataResponse {
                total: report.total,
                successful: report.successful,
                failed: report.failed,
                valid_rows: report.valid_rows,
                errors,
                successful_properties: committed.then_some(result.successful_properties),
            },
        }
    }
}

impl From<&RowValidationError> for FieldErrorResponse {
    fn from(value: &RowValidationError) -> Self {
        Self {
            field: value.fields.join(", "),
            fields: value.fields.clone(),
            message: value.message.clone(),
            kind: value.kind.as_str().to_owned(),
        }
    }
}
