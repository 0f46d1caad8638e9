//! crates/course_catalog_core/src/error.rs
//!
//! The error taxonomy returned by every workflow operation.

use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Input rejected before anything was written (e.g. a short password).
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Unknown email and wrong password deliberately share this variant.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    /// The storage backend failed underneath an operation.
    #[error("Storage error: {0}")]
    Port(#[from] PortError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
