//! Session lifecycle tests: login, rotation, logout, password change

use std::sync::Arc;

use clipstream::auth::{
    LoginIdentifier, NewUser, SessionError, SessionManager, TokenIssuer,
};
use clipstream::config::AuthConfig;
use clipstream::store::{MemoryUserStore, UserStore};

fn manager() -> (SessionManager, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let manager = SessionManager::new(
        store.clone(),
        TokenIssuer::new(&AuthConfig::default()),
    );
    (manager, store)
}

fn new_user(username: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        fullname: format!("{} test", username),
        password: password.to_string(),
        avatar: None,
        cover_image: None,
    }
}

async fn register_alice(manager: &SessionManager) {
    manager
        .register(new_user("alice", "alice@x.com", "secret1"))
        .await
        .expect("registration failed");
}

#[tokio::test]
async fn test_login_then_refresh_yields_new_pair() {
    let (manager, _) = manager();
    register_alice(&manager).await;

    let login = manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
        .await
        .unwrap();

    let refreshed = manager.refresh(Some(&login.refresh_token)).await.unwrap();
    assert_ne!(refreshed.refresh_token, login.refresh_token);
    assert!(!refreshed.access_token.is_empty());
}

#[tokio::test]
async fn test_superseded_refresh_token_is_rejected() {
    let (manager, _) = manager();
    register_alice(&manager).await;

    // login -> (A1, R1); refresh(R1) -> (A2, R2); refresh(R1) must
    // fail; refresh(R2) -> (A3, R3)
    let first = manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
        .await
        .unwrap();
    let r1 = first.refresh_token;

    let second = manager.refresh(Some(&r1)).await.unwrap();
    let r2 = second.refresh_token;
    assert_ne!(r1, r2);

    assert_eq!(
        manager.refresh(Some(&r1)).await.unwrap_err(),
        SessionError::TokenMismatch
    );

    let third = manager.refresh(Some(&r2)).await.unwrap();
    assert_ne!(third.refresh_token, r2);
}

#[tokio::test]
async fn test_logout_then_refresh_fails() {
    let (manager, _) = manager();
    register_alice(&manager).await;

    let session = manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
        .await
        .unwrap();

    manager.logout(&session.user.id).await.unwrap();

    assert_eq!(
        manager.refresh(Some(&session.refresh_token)).await.unwrap_err(),
        SessionError::TokenMismatch
    );
}

#[tokio::test]
async fn test_failed_login_leaves_store_untouched() {
    let (manager, store) = manager();
    register_alice(&manager).await;

    // Establish a session so a stray write would be observable
    let session = manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
        .await
        .unwrap();

    assert_eq!(
        manager
            .login(&LoginIdentifier::Username("alice".to_string()), "wrong")
            .await
            .unwrap_err(),
        SessionError::InvalidCredentials
    );

    let stored = store
        .find_by_id(&session.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.refresh_token, session.refresh_token);
}

#[tokio::test]
async fn test_change_password_switches_accepted_credential() {
    let (manager, _) = manager();
    register_alice(&manager).await;

    let session = manager
        .login(&LoginIdentifier::Email("alice@x.com".to_string()), "secret1")
        .await
        .unwrap();

    manager
        .change_password(&session.user.id, "secret1", "secret2")
        .await
        .unwrap();

    assert_eq!(
        manager
            .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
            .await
            .unwrap_err(),
        SessionError::InvalidCredentials
    );
    manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret2")
        .await
        .expect("login with new password failed");
}

#[tokio::test]
async fn test_change_password_keeps_refresh_token_valid() {
    // Observed behavior: rotating the password does not revoke the
    // outstanding refresh token
    let (manager, _) = manager();
    register_alice(&manager).await;

    let session = manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
        .await
        .unwrap();

    manager
        .change_password(&session.user.id, "secret1", "secret2")
        .await
        .unwrap();

    manager
        .refresh(Some(&session.refresh_token))
        .await
        .expect("refresh should survive a password change");
}

#[tokio::test]
async fn test_login_with_uppercase_username() {
    let (manager, _) = manager();
    register_alice(&manager).await;

    manager
        .login(&LoginIdentifier::Username("ALICE".to_string()), "secret1")
        .await
        .expect("username matching should be case-insensitive");
}

#[tokio::test]
async fn test_relogin_invalidates_previous_refresh_token() {
    let (manager, _) = manager();
    register_alice(&manager).await;

    let first = manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
        .await
        .unwrap();
    let second = manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
        .await
        .unwrap();

    assert_eq!(
        manager.refresh(Some(&first.refresh_token)).await.unwrap_err(),
        SessionError::TokenMismatch
    );
    manager.refresh(Some(&second.refresh_token)).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_refresh_only_one_wins() {
    let (manager, _) = manager();
    register_alice(&manager).await;

    let session = manager
        .login(&LoginIdentifier::Username("alice".to_string()), "secret1")
        .await
        .unwrap();
    let token = session.refresh_token;

    let (a, b) = tokio::join!(
        manager.refresh(Some(&token)),
        manager.refresh(Some(&token)),
    );

    // The compare-and-swap guarantees at most one winner; both may
    // lose only if they interleave with each other's writes, which a
    // single shared token cannot produce here.
    let winners = [a, b].into_iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
}
