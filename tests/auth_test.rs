use rusty_todos::auth::password::PasswordHasher;
use rusty_todos::auth::token::{TokenScope, TokenService};
use rusty_todos::config::HashConfig;
use rusty_todos::error::RustyTodosError;
use uuid::Uuid;

const SECRET: &str = "integration-signing-key-3c4d5e6f7a8b9c0d";

fn hasher() -> PasswordHasher {
    PasswordHasher::new(&HashConfig::for_testing()).unwrap()
}

#[test]
fn test_password_round_trip() {
    let hasher = hasher();

    for password in ["secret1", "Password123!", "p@ss wörd with spaces", "123ndf"] {
        let hash = hasher.hash(password).unwrap();
        assert!(hasher.verify(password, &hash).unwrap(), "failed for {}", password);
    }
}

#[test]
fn test_wrong_password_is_false_not_error() {
    let hasher = hasher();
    let hash = hasher.hash("secret1").unwrap();

    for wrong in ["secret2", "Secret1", "secret1 ", "", "wrongpass"] {
        assert_eq!(hasher.verify(wrong, &hash).unwrap(), false, "accepted {:?}", wrong);
    }
}

#[test]
fn test_same_password_hashes_differently() {
    let hasher = hasher();
    let first = hasher.hash("secret1").unwrap();
    let second = hasher.hash("secret1").unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("secret1", &first).unwrap());
    assert!(hasher.verify("secret1", &second).unwrap());
}

#[test]
fn test_malformed_hash_is_hashing_failure() {
    let result = hasher().verify("secret1", "not-a-phc-string");
    assert!(matches!(result, Err(RustyTodosError::HashingFailure(_))));
}

#[test]
fn test_hash_from_other_cost_still_verifies() {
    let cheap = hasher();
    let costlier = PasswordHasher::new(&HashConfig {
        memory_kib: 2048,
        iterations: 2,
        parallelism: 1,
    })
    .unwrap();

    let hash = cheap.hash("secret1").unwrap();
    assert!(costlier.verify("secret1", &hash).unwrap());
}

#[test]
fn test_token_round_trip() {
    let service = TokenService::new(SECRET);

    for _ in 0..5 {
        let user_id = Uuid::new_v4();
        let token = service.issue(&user_id, TokenScope::Auth).unwrap();
        let payload = service.verify(&token).unwrap();

        assert_eq!(payload.subject_id, user_id);
        assert_eq!(payload.scope, TokenScope::Auth);
    }
}

#[test]
fn test_any_mutated_byte_invalidates_token() {
    let service = TokenService::new(SECRET);
    let token = service.issue(&Uuid::new_v4(), TokenScope::Auth).unwrap();

    for (index, original) in token.char_indices() {
        let replacement = if original == 'A' { 'B' } else { 'A' };

        let mut tampered = String::with_capacity(token.len());
        tampered.push_str(&token[..index]);
        tampered.push(replacement);
        tampered.push_str(&token[index + original.len_utf8()..]);

        let result = service.verify(&tampered);
        assert!(
            matches!(result, Err(RustyTodosError::InvalidToken(_))),
            "mutation at byte {} was accepted",
            index
        );
    }
}

#[test]
fn test_swapped_subject_fails() {
    let service = TokenService::new(SECRET);
    let alice = service.issue(&Uuid::new_v4(), TokenScope::Auth).unwrap();
    let jen = service.issue(&Uuid::new_v4(), TokenScope::Auth).unwrap();

    // Jen's payload glued onto Alice's signature
    let alice_parts: Vec<&str> = alice.split('.').collect();
    let jen_parts: Vec<&str> = jen.split('.').collect();
    let forged = format!("{}.{}.{}", alice_parts[0], jen_parts[1], alice_parts[2]);

    assert!(matches!(service.verify(&forged), Err(RustyTodosError::InvalidToken(_))));
}

#[test]
fn test_token_payload_shape() {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    let service = TokenService::new(SECRET);
    let user_id = Uuid::new_v4();
    let token = service.issue(&user_id, TokenScope::Auth).unwrap();

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    let data = decode::<serde_json::Value>(
        &token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &validation,
    )
    .unwrap();

    assert_eq!(data.claims["sub"], user_id.to_string());
    assert_eq!(data.claims["access"], "auth");
}
