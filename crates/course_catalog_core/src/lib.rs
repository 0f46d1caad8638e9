pub mod catalog;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod ports;
pub mod repositories;
pub mod seed;
pub mod service;
pub mod storage;

pub use credentials::PlaintextVerifier;
pub use domain::{
    Account, CatalogFilter, Course, CourseDetail, Dashboard, DashboardEntry, EnrollOutcome,
    Enrollment, Lesson, Role, SessionUser,
};
pub use error::{CatalogError, CatalogResult};
pub use ports::{
    CourseRepository, CredentialVerifier, EnrollmentRepository, KeyValueStore, PortError,
    PortResult, SessionStore, UserRepository,
};
pub use service::CatalogService;
pub use storage::{MemoryStore, Storage};
