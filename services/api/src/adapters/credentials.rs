//! services/api/src/adapters/credentials.rs
//!
//! An argon2 implementation of the `CredentialVerifier` port. Selected with
//! `CREDENTIAL_SCHEME=argon2`; accounts created under the plaintext scheme
//! cannot log in once it is enabled.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use course_catalog_core::ports::{CredentialVerifier, PortError, PortResult};
use tracing::warn;

#[derive(Default)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn seal(&self, password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, candidate: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored password is not an argon2 hash: {}", e);
                return false;
            }
        };
        self.argon2
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_password_verifies() {
        let verifier = Argon2Verifier::new();
        let stored = verifier.seal("secret1").unwrap();
        assert_ne!(stored, "secret1");
        assert!(verifier.verify("secret1", &stored));
        assert!(!verifier.verify("secret2", &stored));
    }

    #[test]
    fn plaintext_stored_value_is_rejected() {
        let verifier = Argon2Verifier::new();
        assert!(!verifier.verify("secret1", "secret1"));
    }
}
