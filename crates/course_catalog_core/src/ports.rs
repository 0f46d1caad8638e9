//! crates/course_catalog_core/src/ports.rs
//!
//! Defines the contracts (traits) the workflow service depends on.
//! These traits form the boundary of the hexagonal architecture: the raw
//! key-value store is implemented by adapters (in memory here, SQLite in the
//! api service), and each entity gets its own repository on top of it.

use async_trait::async_trait;

use crate::domain::{Account, Course, Enrollment, SessionUser};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Port
//=========================================================================================

/// Whole-value text slots under named keys.
///
/// Writes fully replace the previous content of a key. There are no partial
/// updates and no transactions: callers read, modify and write back.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> PortResult<Option<String>>;

    async fn set_raw(&self, key: &str, value: &str) -> PortResult<()>;

    async fn remove(&self, key: &str) -> PortResult<()>;
}

//=========================================================================================
// Repository Ports
//=========================================================================================

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Returns the catalog, seeding the sample courses if none is stored yet.
    async fn list(&self) -> PortResult<Vec<Course>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> PortResult<Vec<Account>>;

    async fn find_by_email(&self, email: &str) -> PortResult<Option<Account>>;

    /// Appends an account. Uniqueness is checked by the caller.
    async fn insert(&self, account: Account) -> PortResult<()>;

    async fn remove(&self, email: &str) -> PortResult<()>;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn list(&self) -> PortResult<Vec<Enrollment>>;

    async fn save_all(&self, enrollments: &[Enrollment]) -> PortResult<()>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn current(&self) -> PortResult<Option<SessionUser>>;

    async fn set(&self, user: &SessionUser) -> PortResult<()>;

    async fn clear(&self) -> PortResult<()>;
}

//=========================================================================================
// Credential Port
//=========================================================================================

/// Seals passwords for storage and checks login attempts against them.
pub trait CredentialVerifier: Send + Sync {
    /// Produces the form stored in `Account::password`.
    fn seal(&self, password: &str) -> PortResult<String>;

    fn verify(&self, candidate: &str, stored: &str) -> bool;
}
