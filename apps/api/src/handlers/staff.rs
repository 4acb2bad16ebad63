use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use estatery_application::CreateStaffInput;
use estatery_core::StaffIdentity;

use crate::dto::{CreateStaffRequest, StaffResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_staff_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
) -> ApiResult<Json<Vec<StaffResponse>>> {
    let members = state
        .staff_service
        .list_staff(&staff)
        .await?
        .into_iter()
        .map(StaffResponse::from)
        .collect();

    Ok(Json(members))
}

pub async fn create_staff_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Json(payload): Json<CreateStaffRequest>,
) -> ApiResult<(StatusCode, Json<StaffResponse>)> {
    let created = state
        .staff_service
        .create_staff(
            &staff,
            CreateStaffInput {
                display_name: payload.display_name,
                email: payload.email,
                role_name: payload.role_name,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(StaffResponse::from(created))))
}
