#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for the session orchestrator: the key exists only
//! while authenticated, logout clears it, and the remembered username
//! is a convenience that never restores a key.

use cachette_vault::error::VaultError;
use cachette_vault::{
    generate_recovery_phrase, put_file, remembered_username, MemoryStore, SessionGuard,
};

#[test]
fn guard_gates_item_operations_on_a_live_session() {
    let store = MemoryStore::new();
    let mut guard = SessionGuard::new();

    assert!(matches!(
        guard.session(),
        Err(VaultError::EncryptionUnavailable)
    ));

    guard.sign_up(&store, "alice", "pw12345!").expect("signup");
    let session = guard.session().expect("authenticated");
    put_file(&store, session, "doc.txt", "text/plain", b"bytes").expect("put");

    guard.log_out(&store);
    assert!(!guard.is_authenticated());
    assert!(matches!(
        guard.session(),
        Err(VaultError::EncryptionUnavailable)
    ));
}

#[test]
fn failed_login_does_not_create_a_session() {
    let store = MemoryStore::new();
    let mut guard = SessionGuard::new();
    guard.sign_up(&store, "alice", "pw12345!").expect("signup");
    guard.log_out(&store);

    let err = guard
        .log_in(&store, "alice", "wrong")
        .expect_err("wrong password");
    assert!(matches!(err, VaultError::InvalidCredentials));
    assert!(!guard.is_authenticated());
}

#[test]
fn remembered_username_survives_logout_boundary_but_key_does_not() {
    let store = MemoryStore::new();
    let mut guard = SessionGuard::new();

    assert_eq!(remembered_username(&store).expect("read"), None);

    guard.sign_up(&store, "alice", "pw12345!").expect("signup");
    assert_eq!(
        remembered_username(&store).expect("read"),
        Some("alice".to_string())
    );

    // A "process restart": a fresh guard starts logged out even though
    // the username is remembered — the key is never restored.
    let restarted = SessionGuard::new();
    assert!(!restarted.is_authenticated());
    assert_eq!(
        remembered_username(&store).expect("read"),
        Some("alice".to_string())
    );

    guard.log_out(&store);
    assert_eq!(remembered_username(&store).expect("read"), None);
}

#[test]
fn reset_password_establishes_a_session() {
    let store = MemoryStore::new();
    let mut guard = SessionGuard::new();
    guard.sign_up(&store, "alice", "old-pw").expect("signup");
    guard.log_out(&store);

    let phrase = generate_recovery_phrase().expect("generate");
    guard
        .reset_password(&store, "alice", &phrase, "new-pw")
        .expect("reset");
    assert!(guard.is_authenticated());
    assert_eq!(guard.session().expect("session").username(), "alice");
}

#[test]
fn deleting_the_active_account_ends_the_session() {
    let store = MemoryStore::new();
    let mut guard = SessionGuard::new();
    guard.sign_up(&store, "alice", "pw").expect("signup");

    guard.delete_account(&store, "alice").expect("delete");
    assert!(!guard.is_authenticated());
}

#[test]
fn deleting_another_account_keeps_the_session() {
    let store = MemoryStore::new();
    let mut guard = SessionGuard::new();
    guard.sign_up(&store, "bob", "pw-b").expect("signup bob");
    guard.log_out(&store);
    guard.sign_up(&store, "alice", "pw-a").expect("signup alice");

    guard.delete_account(&store, "bob").expect("delete bob");
    assert!(guard.is_authenticated());
    assert_eq!(guard.session().expect("session").username(), "alice");
}
