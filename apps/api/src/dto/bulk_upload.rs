mod conversions;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a bulk upload pass.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bulk-upload-request.ts"
)]
pub struct BulkUploadRequest {
    pub csv: String,
    pub transaction_type: String,
    /// Omitted means a dry run; only an explicit `false` commits.
    #[serde(default = "dry_run")]
    pub validate_only: bool,
}

fn dry_run() -> bool {
    true
}

/// Envelope returned by both bulk upload passes.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bulk-upload-response.ts"
)]
pub struct BulkUploadResponse {
    pub success: bool,
    pub data: BulkUploadDataResponse,
}

/// Validation counts, grouped errors and created listing ids.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bulk-upload-data-response.ts"
)]
pub struct BulkUploadDataResponse {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub valid_rows: Vec<usize>,
    pub errors: Vec<RowErrorsResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub successful_properties: Option<Vec<String>>,
}

/// Problems found on one CSV row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/row-errors-response.ts"
)]
pub struct RowErrorsResponse {
    pub row: usize,
    pub errors: Vec<FieldErrorResponse>,
}

/// One problem on a row.
///
/// `field` joins several fields with `", "` for display; `fields` keeps
/// them apart, since extra-column labels may themselves contain commas.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/field-error-response.ts"
)]
pub struct FieldErrorResponse {
    pub field: String,
    pub fields: Vec<String>,
    pub message: String,
    #[serde(rename = "type")]
    #[ts(type = "\"missing_fields\" | \"extra_fields\" | \"invalid_format\" | \"validation_error\"")]
    pub kind: String,
}
