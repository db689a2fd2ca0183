use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

use crate::auth::user::UserId;
use crate::error::{Result, RustyTodosError};

/// What a token grants. Only plain authentication exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    Auth,
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenScope::Auth => write!(f, "auth"),
        }
    }
}

/// Signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Scope the token was issued for
    pub access: TokenScope,
}

/// Verified token payload with a typed subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPayload {
    pub subject_id: UserId,
    pub scope: TokenScope,
}

/// Issues and verifies signed bearer tokens (HS256).
///
/// Tokens carry no expiry or nonce, so the same payload always yields the
/// same token. Verification only proves the payload was not tampered with;
/// whether the token is still live is decided by the user store.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service with a secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign `{subject, scope}` into an opaque token string
    pub fn issue(&self, subject_id: &UserId, scope: TokenScope) -> Result<String> {
        let claims = Claims {
            sub: subject_id.to_string(),
            access: scope,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| RustyTodosError::InvalidToken(format!("Failed to generate token: {}", e)))
    }

    /// Decode a token and check its signature. Does not consult the live-token set.
    pub fn verify(&self, token: &str) -> Result<TokenPayload> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| RustyTodosError::InvalidToken(e.to_string()))?;

        let subject_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| RustyTodosError::InvalidToken("Malformed subject".to_string()))?;

        Ok(TokenPayload {
            subject_id,
            scope: data.claims.access,
        })
    }
}

/// Short digest of a token, safe to put in logs
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let hex = format!("{:x}", digest);
    hex[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "token-tests-signing-key-5f4e3d2c1b0a9988";

    #[test]
    fn test_issue_verify_round_trip() {
        let service = TokenService::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = service.issue(&user_id, TokenScope::Auth).unwrap();
        let payload = service.verify(&token).unwrap();

        assert_eq!(payload.subject_id, user_id);
        assert_eq!(payload.scope, TokenScope::Auth);
    }

    #[test]
    fn test_issue_is_deterministic() {
        let service = TokenService::new(SECRET);
        let user_id = Uuid::new_v4();

        let first = service.issue(&user_id, TokenScope::Auth).unwrap();
        let second = service.issue(&user_id, TokenScope::Auth).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new(SECRET);
        let other = TokenService::new("another-signing-key-0a1b2c3d4e5f6a7b8c");

        let token = issuer.issue(&Uuid::new_v4(), TokenScope::Auth).unwrap();
        assert!(matches!(other.verify(&token), Err(RustyTodosError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = TokenService::new(SECRET);
        for token in ["", "invalid.token.here", "a.b", "...."] {
            assert!(service.verify(token).is_err(), "accepted {:?}", token);
        }
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let service = TokenService::new(SECRET);
        let claims = Claims {
            sub: "4".to_string(),
            access: TokenScope::Auth,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(service.verify(&token), Err(RustyTodosError::InvalidToken(_))));
    }

    #[test]
    fn test_fingerprint_is_short_and_stable() {
        let first = token_fingerprint("some-token");
        assert_eq!(first.len(), 12);
        assert_eq!(first, token_fingerprint("some-token"));
        assert_ne!(first, token_fingerprint("other-token"));
    }
}
