//! Salted one-way password hashing (Argon2id, PHC string format)

use argon2::password_hash::{
    rand_core::OsRng, Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier,
    SaltString,
};
use argon2::{Algorithm, Argon2, Version};

use crate::config::HashConfig;
use crate::error::{Result, RustyTodosError};

/// Hashes and verifies credentials.
///
/// Every hash carries its own salt and cost parameters, so hashes created
/// under an older cost setting keep verifying after the configuration changes.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(config: &HashConfig) -> Result<Self> {
        let params = config.params()?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Derive a salted digest. A fresh random salt is drawn on every call.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| RustyTodosError::HashingFailure(format!("Failed to hash password: {}", e)))
    }

    /// Check `plaintext` against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
    /// The digest comparison inside `verify_password` is constant-time.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| RustyTodosError::HashingFailure(format!("Malformed password hash: {}", e)))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(RustyTodosError::HashingFailure(format!(
                "Failed to verify password: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&HashConfig::for_testing()).unwrap()
    }

    #[test]
    fn test_hash_is_phc_and_not_plaintext() {
        let hash = hasher().hash("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_fresh_salt_each_call() {
        let hasher = hasher();
        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("secret1", &first).unwrap());
        assert!(hasher.verify("secret1", &second).unwrap());
    }

    #[test]
    fn test_verify_rejects_other_passwords() {
        let hasher = hasher();
        let hash = hasher.hash("userOnePass").unwrap();
        assert!(!hasher.verify("userOnePasS", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_hashing_failure() {
        let result = hasher().verify("secret1", "not-a-phc-string");
        assert!(matches!(result, Err(RustyTodosError::HashingFailure(_))));
    }

    #[test]
    fn test_hash_from_other_cost_still_verifies() {
        let cheap = hasher();
        let hash = cheap.hash("secret1").unwrap();

        let costlier = PasswordHasher::new(&HashConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(costlier.verify("secret1", &hash).unwrap());
    }
}
