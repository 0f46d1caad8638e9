//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how each
//! variant is presented to HTTP clients.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use course_catalog_core::CatalogError;
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A workflow operation refused the request or its storage failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The request body was missing, not JSON, or lacked a required field.
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// The route needs a logged-in user and the session slot is empty.
    #[error("Please login or register to continue")]
    LoginRequired,

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Catalog(CatalogError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(CatalogError::DuplicateEmail(_)) => StatusCode::CONFLICT,
            ApiError::Catalog(CatalogError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            ApiError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::LoginRequired => StatusCode::UNAUTHORIZED,
            ApiError::Body(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Catalog(CatalogError::Validation(msg)) => msg.clone(),
            ApiError::Catalog(CatalogError::DuplicateEmail(_)) => "Email already registered".to_string(),
            ApiError::Catalog(CatalogError::InvalidCredentials) => "Invalid credentials".to_string(),
            ApiError::Catalog(CatalogError::NotFound(what)) => format!("{} not found", what),
            ApiError::LoginRequired => self.to_string(),
            ApiError::Body(rejection) => rejection.body_text(),
            _ => {
                error!("Request failed: {:?}", self);
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
