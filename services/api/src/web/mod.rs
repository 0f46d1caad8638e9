pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use auth::{current_session_handler, login_handler, logout_handler, register_handler};
use middleware::require_session;
use rest::{
    complete_lesson_handler, course_detail_handler, dashboard_handler, enroll_handler,
    list_categories_handler, list_courses_handler, ApiDoc,
};
use state::AppState;

/// Builds the full application router: catalog, auth, protected enrollment
/// routes and the Swagger UI.
pub fn build_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/courses", get(list_courses_handler))
        .route("/categories", get(list_categories_handler))
        .route("/courses/{slug}", get(course_detail_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/session", get(current_session_handler));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .route("/enrollments/{course_id}", post(enroll_handler))
        .route(
            "/enrollments/{course_id}/lessons/{lesson_id}/complete",
            post(complete_lesson_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())))
}
