//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, logout and reading the
//! current session. The session is the single slot of the local profile, so
//! no cookie is involved: whoever logged in last is the current user.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use course_catalog_core::{Role, SessionUser};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `student` or `instructor`; defaults to `student`.
    pub role: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The public view of the logged-in user.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<SessionUser> for SessionView {
    fn from(user: SessionUser) -> Self {
        Self {
            role: user.role.to_string(),
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: Option<SessionView>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new account and log it in
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered and logged in", body = SessionView),
        (status = 400, description = "Password must be at least 6 characters"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Malformed request body"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let role = match req.role.as_deref() {
        Some(role) => role.parse::<Role>()?,
        None => Role::Student,
    };
    let user = state
        .catalog
        .register(&req.name, &req.email, &req.password, role)
        .await?;
    Ok((StatusCode::CREATED, Json(SessionView::from(user))))
}

/// POST /auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionView),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Malformed request body"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let Json(req) = payload?;
    let user = state.catalog.login(&req.email, &req.password).await?;
    Ok(Json(user.into()))
}

/// POST /auth/logout - Clear the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Logged out")
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.catalog.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/session - Who is logged in, if anyone
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "The current session, or null", body = SessionResponse)
    )
)]
pub async fn current_session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = state.catalog.current_session().await?;
    Ok(Json(SessionResponse {
        user: user.map(SessionView::from),
    }))
}
