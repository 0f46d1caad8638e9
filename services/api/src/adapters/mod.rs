pub mod credentials;
pub mod db;

pub use credentials::Argon2Verifier;
pub use db::SqlKeyValueStore;
