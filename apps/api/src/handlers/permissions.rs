use axum::Json;
use axum::extract::{Extension, Query, State};
use estatery_core::StaffIdentity;

use crate::dto::{
    ModuleSectionResponse, MyPermissionsQuery, MyPermissionsResponse, PermissionCheckResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn permission_structure_handler(
    State(state): State<AppState>,
) -> Json<Vec<ModuleSectionResponse>> {
    Json(
        state
            .authorization_service
            .structure()
            .sections()
            .iter()
            .map(ModuleSectionResponse::from)
            .collect(),
    )
}

pub async fn my_permissions_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Query(query): Query<MyPermissionsQuery>,
) -> ApiResult<Json<MyPermissionsResponse>> {
    let resolver = state.authorization_service.resolver_for(&staff).await?;

    let check = query.path.map(|path| PermissionCheckResponse {
        allowed: query
            .action
            .as_deref()
            .map(|action| resolver.can(path.as_str(), action)),
        hidden: resolver.is_hidden(path.as_str()),
        action: query.action.clone(),
        path,
    });

    Ok(Json(MyPermissionsResponse {
        role_name: resolver.role_name().map(str::to_owned),
        permissions: resolver.permissions().map(|tree| tree.to_value()),
        check,
    }))
}
