//! Server configuration module
//! Every component receives its settings from here through its constructor

use crate::constants::{
    DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_PORT,
    MIN_SECRET_LENGTH,
};
use crate::error::{Result, RustyTodosError};
use std::env;
use std::fmt;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashConfig {
    /// Cheap parameters for tests. Never use these in production.
    pub fn for_testing() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Build the Argon2 parameter set, rejecting combinations Argon2 refuses
    pub fn params(&self) -> Result<argon2::Params> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| RustyTodosError::ConfigError(format!("Invalid hash parameters: {}", e)))
    }
}

/// Server configuration parameters
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Secret used to sign and verify auth tokens
    pub jwt_secret: String,
    /// Password hashing cost
    pub hash: HashConfig,
    /// Minimum accepted password length, in characters
    pub min_password_length: usize,
    /// Maximum accepted JSON body size
    pub max_body_bytes: u64,
    /// TLS configuration
    pub enable_tls: bool,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("hash", &self.hash)
            .field("min_password_length", &self.min_password_length)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("enable_tls", &self.enable_tls)
            .field("tls_cert_path", &self.tls_cert_path)
            .field("tls_key_path", &self.tls_key_path)
            .finish()
    }
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "unit-tests-only-signing-key-9f8e7d6c5b4a3210".to_string(),
            hash: HashConfig::for_testing(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            enable_tls: false,
            tls_cert_path: None,
            tls_key_path: None,
        }
    }

    /// Validate that the signing secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(RustyTodosError::ConfigError(format!(
                "JWT secret must be at least {} characters long",
                MIN_SECRET_LENGTH
            )));
        }

        // Placeholder values copied out of docs and tutorials
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "abc123",
            "default",
            "secret",
            "password",
            "12345",
        ];

        let lowered = secret.to_lowercase();
        for pattern in &insecure_patterns {
            if lowered.contains(pattern) {
                return Err(RustyTodosError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Generate one with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RustyTodosError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols)".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Failed to load .env file: {}", e),
        }

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("RUSTY_TODOS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "RUSTY_TODOS_PORT", DEFAULT_PORT)?;

        let jwt_secret = lookup("RUSTY_TODOS_JWT_SECRET")
            .or_else(|| lookup("JWT_SECRET"))
            .ok_or_else(|| {
                RustyTodosError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;
        Self::validate_jwt_secret(&jwt_secret)?;

        let defaults = HashConfig::default();
        let hash = HashConfig {
            memory_kib: parse_or(&lookup, "RUSTY_TODOS_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "RUSTY_TODOS_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "RUSTY_TODOS_HASH_PARALLELISM", defaults.parallelism)?,
        };
        hash.params()?;

        let min_password_length = parse_or(
            &lookup,
            "RUSTY_TODOS_MIN_PASSWORD_LEN",
            DEFAULT_MIN_PASSWORD_LENGTH,
        )?;
        if min_password_length == 0 {
            return Err(RustyTodosError::ConfigError(
                "RUSTY_TODOS_MIN_PASSWORD_LEN must be at least 1".to_string(),
            ));
        }

        let max_body_bytes = parse_or(&lookup, "RUSTY_TODOS_MAX_BODY", DEFAULT_MAX_BODY_BYTES)?;

        let enable_tls = lookup("RUSTY_TODOS_ENABLE_TLS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);
        let tls_cert_path = lookup("RUSTY_TODOS_TLS_CERT_PATH");
        let tls_key_path = lookup("RUSTY_TODOS_TLS_KEY_PATH");

        if enable_tls {
            match (&tls_cert_path, &tls_key_path) {
                (Some(cert_path), Some(key_path)) => {
                    if !std::path::Path::new(cert_path).exists() {
                        return Err(RustyTodosError::ConfigError(format!(
                            "TLS certificate file does not exist: {}",
                            cert_path
                        )));
                    }
                    if !std::path::Path::new(key_path).exists() {
                        return Err(RustyTodosError::ConfigError(format!(
                            "TLS private key file does not exist: {}",
                            key_path
                        )));
                    }
                }
                _ => {
                    return Err(RustyTodosError::ConfigError(
                        "TLS is enabled but RUSTY_TODOS_TLS_CERT_PATH or RUSTY_TODOS_TLS_KEY_PATH is not set"
                            .to_string(),
                    ))
                }
            }
        }

        Ok(Self {
            host,
            port,
            jwt_secret,
            hash,
            min_password_length,
            max_body_bytes,
            enable_tls,
            tls_cert_path,
            tls_key_path,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            RustyTodosError::ConfigError(format!("{} has an invalid value: '{}'", key, raw))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const GOOD_SECRET: &str = "k7Qz-9vLw_2mXr4T8pYs3nB6cJ1hF0dGa";

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_for_testing_works_in_tests() {
        let config = ServerConfig::for_testing();
        assert!(config.jwt_secret.contains("tests"));
        assert!(config.hash.params().is_ok());
        assert!(!config.enable_tls);
    }

    #[test]
    fn test_defaults_applied() {
        let config = ServerConfig::from_vars(lookup_from(&[("JWT_SECRET", GOOD_SECRET)])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.hash, HashConfig::default());
        assert_eq!(config.min_password_length, DEFAULT_MIN_PASSWORD_LENGTH);
    }

    #[test]
    fn test_requires_secret() {
        let result = ServerConfig::from_vars(lookup_from(&[]));
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_prefixed_secret_wins() {
        let config = ServerConfig::from_vars(lookup_from(&[
            ("JWT_SECRET", "fallback-key-that-is-long-enough-0987654321"),
            ("RUSTY_TODOS_JWT_SECRET", GOOD_SECRET),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, GOOD_SECRET);
    }

    #[test]
    fn test_weak_secrets_rejected() {
        for secret in [
            "short1",
            "abc123abc123abc123abc123abc123abc123",
            "onlylettersonlylettersonlylettersonly",
            "my-super-secret-value-with-digits-2024",
        ] {
            let result = ServerConfig::from_vars(lookup_from(&[("JWT_SECRET", secret)]));
            assert!(result.is_err(), "should reject {}", secret);
        }
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let result = ServerConfig::from_vars(lookup_from(&[
            ("JWT_SECRET", GOOD_SECRET),
            ("RUSTY_TODOS_PORT", "not-a-port"),
        ]));
        assert!(result.unwrap_err().to_string().contains("RUSTY_TODOS_PORT"));
    }

    #[test]
    fn test_invalid_hash_params_rejected() {
        let result = ServerConfig::from_vars(lookup_from(&[
            ("JWT_SECRET", GOOD_SECRET),
            ("RUSTY_TODOS_HASH_ITERATIONS", "0"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_tls_requires_paths() {
        let result = ServerConfig::from_vars(lookup_from(&[
            ("JWT_SECRET", GOOD_SECRET),
            ("RUSTY_TODOS_ENABLE_TLS", "true"),
        ]));
        assert!(result.unwrap_err().to_string().contains("TLS"));

        let result = ServerConfig::from_vars(lookup_from(&[
            ("JWT_SECRET", GOOD_SECRET),
            ("RUSTY_TODOS_ENABLE_TLS", "1"),
            ("RUSTY_TODOS_TLS_CERT_PATH", "/nonexistent/cert.pem"),
            ("RUSTY_TODOS_TLS_KEY_PATH", "/nonexistent/key.pem"),
        ]));
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }
}
