use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Query, State};
use estatery_core::StaffIdentity;
use estatery_domain::TransactionType;

use crate::dto::{ListPropertiesQuery, PropertyListingResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_properties_handler(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Query(query): Query<ListPropertiesQuery>,
) -> ApiResult<Json<Vec<PropertyListingResponse>>> {
    let transaction_type = query
        .transaction_type
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(TransactionType::from_str)
        .transpose()?;

    let listings = state
        .bulk_import_service
        .list_listings(&staff, transaction_type)
        .await?
        .into_iter()
        .map(PropertyListingResponse::from)
        .collect();

    Ok(Json(listings))
}
