use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::HeaderName;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use estatery_core::StaffIdentity;
use estatery_domain::TransactionType;
use tracing::debug;

use crate::dto::{BulkUploadRequest, BulkUploadResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn bulk_upload_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Json(payload): Json<BulkUploadRequest>,
) -> ApiResult<Json<BulkUploadResponse>> {
    let transaction_type = TransactionType::from_str(payload.transaction_type.as_str())?;
    debug!(
        staff = %staff.subject(),
        transaction_type = transaction_type.as_str(),
        validate_only = payload.validate_only,
        bytes = payload.csv.len(),
        "bulk upload received"
    );

    let result = state
        .bulk_import_service
        .upload(
            &staff,
            payload.csv.as_str(),
            transaction_type,
            payload.validate_only,
        )
        .await?;

    Ok(Json(BulkUploadResponse::from_result(
        result,
        !payload.validate_only,
    )))
}

pub async fn bulk_upload_template_handler(
    State(state): State<AppState>,
    Path(transaction_type): Path<String>,
) -> ApiResult<([(HeaderName, String); 2], String)> {
    let transaction_type = TransactionType::from_str(transaction_type.as_str())?;
    let template = state.bulk_import_service.template(transaction_type);

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}-bulk-upload-template.csv\"",
                    transaction_type.as_str()
                ),
            ),
        ],
        template,
    ))
}
