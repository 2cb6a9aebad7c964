//! Token issuer and password hasher tests

use clipstream::auth::{hash_password, verify_password, TokenIssuer};
use clipstream::config::AuthConfig;

fn issuer() -> TokenIssuer {
    TokenIssuer::new(&AuthConfig::default())
}

#[test]
fn test_access_token_round_trip() {
    let issuer = issuer();
    let token = issuer.issue_access_token("user-1").expect("Failed to issue");
    assert_eq!(token.split('.').count(), 3); // JWT format: header.payload.signature

    let claims = issuer.verify_access_token(&token).expect("Failed to verify");
    assert_eq!(claims.sub, "user-1");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_refresh_token_round_trip() {
    let issuer = issuer();
    let token = issuer.issue_refresh_token("user-1").expect("Failed to issue");
    let claims = issuer.verify_refresh_token(&token).expect("Failed to verify");
    assert_eq!(claims.sub, "user-1");
}

#[test]
fn test_secrets_are_not_interchangeable() {
    let issuer = issuer();
    let access = issuer.issue_access_token("user-1").unwrap();
    let refresh = issuer.issue_refresh_token("user-1").unwrap();

    // An access token must never be usable as a refresh token or
    // vice versa
    assert!(issuer.verify_refresh_token(&access).is_err());
    assert!(issuer.verify_access_token(&refresh).is_err());
}

#[test]
fn test_tokens_fail_across_differently_keyed_issuers() {
    let a = issuer();
    let b = TokenIssuer::new(&AuthConfig {
        access_secret: "another-access-secret".to_string(),
        refresh_secret: "another-refresh-secret".to_string(),
        ..AuthConfig::default()
    });

    let token = a.issue_access_token("user-1").unwrap();
    assert!(b.verify_access_token(&token).is_err());
}

#[test]
fn test_tokens_issued_in_same_second_are_distinct() {
    // Issuance must be unique per call even at second-granularity
    // timestamps, otherwise rotation would swap a refresh token for
    // an identical one and the superseded token would stay valid.
    let issuer = issuer();
    let tokens: Vec<String> = (0..5)
        .map(|_| issuer.issue_refresh_token("user-1").unwrap())
        .collect();

    for (i, a) in tokens.iter().enumerate() {
        for b in tokens.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_malformed_token_rejection() {
    let issuer = issuer();
    assert!(issuer.verify_access_token("not-a-jwt-token").is_err());
    assert!(issuer.verify_access_token("invalid.token.here").is_err());
    assert!(issuer.verify_access_token("").is_err());
}

#[test]
fn test_password_hash_and_verify() {
    let hashed = hash_password("secret1").expect("Failed to hash");
    assert_ne!(hashed, "secret1");
    assert!(verify_password("secret1", &hashed).unwrap());
    assert!(!verify_password("wrong", &hashed).unwrap());
}

#[test]
fn test_password_hashes_are_salted() {
    let a = hash_password("secret1").unwrap();
    let b = hash_password("secret1").unwrap();
    assert_ne!(a, b);
}
