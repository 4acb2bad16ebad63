use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use estatery_core::{AppError, RecordId};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the staff id forwarded by the authenticating gateway.
pub const STAFF_ID_HEADER: &str = "x-staff-id";

pub async fn require_staff(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let staff_id = request
        .headers()
        .get(STAFF_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let staff_id = RecordId::parse(staff_id)
        .map_err(|_| AppError::Unauthorized("invalid staff id".to_owned()))?;
    let identity = state
        .staff_service
        .find_identity(staff_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("unknown staff '{staff_id}'")))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
