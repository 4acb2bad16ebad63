mod cors;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use estatery_core::AppError;
use tower_http::trace::TraceLayer;

use crate::api_config::ApiConfig;
use crate::state::AppState;
use crate::{handlers, middleware};

/// JSON escaping can double a CSV payload; the service enforces the real limit.
const BULK_UPLOAD_BODY_OVERHEAD: usize = 64 * 1024;

pub fn build_router(app_state: AppState, config: &ApiConfig) -> Result<Router, AppError> {
    let bulk_upload_routes = Router::new()
        .route(
            "/api/properties/bulk-upload",
            post(handlers::bulk_upload::bulk_upload_handler),
        )
        .layer(DefaultBodyLimit::max(
            config
                .bulk_upload_max_bytes
                .saturating_mul(2)
                .saturating_add(BULK_UPLOAD_BODY_OVERHEAD),
        ));

    let protected_routes = Router::new()
        .route(
            "/api/me/permissions",
            get(handlers::permissions::my_permissions_handler),
        )
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .put(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/controls",
            put(handlers::roles::set_role_control_handler),
        )
        .route(
            "/api/roles/{role_id}/access",
            put(handlers::roles::set_role_access_handler),
        )
        .route(
            "/api/staff",
            get(handlers::staff::list_staff_handler).post(handlers::staff::create_staff_handler),
        )
        .route(
            "/api/properties",
            get(handlers::properties::list_properties_handler),
        )
        .route(
            "/api/properties/bulk-upload/template/{transaction_type}",
            get(handlers::bulk_upload::bulk_upload_template_handler),
        )
        .merge(bulk_upload_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_staff,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/permissions/structure",
            get(handlers::permissions::permission_structure_handler),
        )
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(config.frontend_url.as_str())?)
        .with_state(app_state))
}
