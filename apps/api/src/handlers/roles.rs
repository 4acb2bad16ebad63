use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use estatery_application::{CreateRoleInput, UpdateRoleInput};
use estatery_core::{RecordId, StaffIdentity};
use estatery_domain::RoleStatus;

use crate::dto::{
    CreateRoleRequest, RoleResponse, SetRoleAccessRequest, SetRoleControlRequest,
    UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_service
        .list_roles(&staff)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .get_role(&staff, RecordId::parse(role_id.as_str())?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let status = parse_status(payload.status.as_deref())?.unwrap_or(RoleStatus::Active);

    let role = state
        .role_service
        .create_role(
            &staff,
            CreateRoleInput {
                name: payload.name,
                status,
                is_approver: payload.is_approver,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .update_role(
            &staff,
            RecordId::parse(role_id.as_str())?,
            UpdateRoleInput {
                name: payload.name,
                status: parse_status(payload.status.as_deref())?,
                is_approver: payload.is_approver,
                permissions: payload.permissions,
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .role_service
        .delete_role(&staff, RecordId::parse(role_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_role_control_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<SetRoleControlRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .set_control(
            &staff,
            RecordId::parse(role_id.as_str())?,
            payload.path.as_str(),
            payload.control.as_str(),
            payload.value,
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn set_role_access_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<SetRoleAccessRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .set_access(
            &staff,
            RecordId::parse(role_id.as_str())?,
            payload.path.as_str(),
            payload.enabled,
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

fn parse_status(value: Option<&str>) -> ApiResult<Option<RoleStatus>> {
    Ok(value.map(RoleStatus::from_str).transpose()?)
}
