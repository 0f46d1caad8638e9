//! crates/course_catalog_core/src/credentials.rs

use crate::ports::{CredentialVerifier, PortResult};

/// Stores passwords as given and compares them by exact string match.
///
/// Not secure. The api service offers an argon2 verifier instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn seal(&self, password: &str) -> PortResult<String> {
        Ok(password.to_string())
    }

    fn verify(&self, candidate: &str, stored: &str) -> bool {
        candidate == stored
    }
}
