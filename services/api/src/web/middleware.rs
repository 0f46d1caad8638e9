//! services/api/src/web/middleware.rs
//!
//! Session middleware for routes that need a logged-in user.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::state::AppState;

/// Middleware that loads the current session and hands it to the handler.
///
/// If a user is logged in, the `SessionUser` is inserted into request extensions.
/// Otherwise the request is answered with 401 and a "please login" message.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = state
        .catalog
        .current_session()
        .await?
        .ok_or(ApiError::LoginRequired)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
