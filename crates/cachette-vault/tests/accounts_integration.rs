#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for the account registry: signup, login, username
//! enumeration, and account deletion with vault purge.

use cachette_vault::error::VaultError;
use cachette_vault::{
    account_exists, add_credential, create_account, delete_account, list_credentials,
    list_usernames, put_file, verify_login, CredentialContent, CredentialKind, MemoryStore,
    SqliteStore,
};

#[test]
fn signup_then_login_preserves_vault_id() {
    let store = MemoryStore::new();
    let created = create_account(&store, "alice", "pw12345!").expect("signup");
    let vault_id = created.vault_id().to_string();
    drop(created);

    let session = verify_login(&store, "alice", "pw12345!").expect("login");
    assert_eq!(session.username(), "alice");
    assert_eq!(session.vault_id(), vault_id);
}

#[test]
fn wrong_password_fails_generically() {
    let store = MemoryStore::new();
    create_account(&store, "alice", "pw12345!").expect("signup");

    let err = verify_login(&store, "alice", "wrong").expect_err("wrong password must fail");
    assert!(matches!(err, VaultError::InvalidCredentials));
}

#[test]
fn unknown_user_fails_with_the_same_error() {
    let store = MemoryStore::new();
    let err = verify_login(&store, "nobody", "pw12345!").expect_err("unknown user must fail");
    assert!(matches!(err, VaultError::InvalidCredentials));
}

#[test]
fn duplicate_username_is_rejected() {
    let store = MemoryStore::new();
    create_account(&store, "alice", "pw12345!").expect("signup");

    let err = create_account(&store, "alice", "other-pw").expect_err("duplicate must fail");
    assert!(matches!(err, VaultError::UsernameTaken(ref u) if u == "alice"));
}

#[test]
fn usernames_are_case_sensitive() {
    let store = MemoryStore::new();
    create_account(&store, "alice", "pw-one").expect("signup alice");
    create_account(&store, "Alice", "pw-two").expect("Alice is a distinct account");

    assert!(account_exists(&store, "alice").expect("exists"));
    assert!(account_exists(&store, "Alice").expect("exists"));
    assert!(!account_exists(&store, "ALICE").expect("exists"));
}

#[test]
fn list_usernames_enumerates_all_accounts() {
    let store = MemoryStore::new();
    assert!(list_usernames(&store).expect("list").is_empty());

    create_account(&store, "alice", "pw1").expect("signup");
    create_account(&store, "bob", "pw2").expect("signup");
    create_account(&store, "carol", "pw3").expect("signup");

    let mut names = list_usernames(&store).expect("list");
    names.sort();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
}

#[test]
fn each_account_gets_a_distinct_vault() {
    let store = MemoryStore::new();
    let a = create_account(&store, "alice", "pw1").expect("signup");
    let b = create_account(&store, "bob", "pw2").expect("signup");
    assert_ne!(a.vault_id(), b.vault_id());
}

#[test]
fn delete_account_purges_the_vault() {
    let store = MemoryStore::new();
    let session = create_account(&store, "alice", "pw12345!").expect("signup");
    let vault_id = session.vault_id().to_string();

    put_file(&store, &session, "doc.txt", "text/plain", b"contents").expect("put");
    add_credential(
        &store,
        &session,
        "Gmail",
        CredentialKind::Password,
        &CredentialContent::Text("hunter2".into()),
    )
    .expect("add");
    drop(session);

    delete_account(&store, "alice").expect("delete");

    assert!(!account_exists(&store, "alice").expect("exists"));
    assert!(matches!(
        verify_login(&store, "alice", "pw12345!"),
        Err(VaultError::InvalidCredentials)
    ));
    assert!(list_credentials(&store, &vault_id).expect("list").is_empty());

    // Nothing of the account or its vault survives in the backend.
    use cachette_vault::KeyValueStore;
    for key in store.keys().expect("keys") {
        assert!(!key.contains("alice"), "leftover account key: {key}");
        assert!(!key.contains(&vault_id), "leftover vault key: {key}");
    }
}

#[test]
fn delete_unknown_account_reports_not_found() {
    let store = MemoryStore::new();
    let err = delete_account(&store, "ghost").expect_err("unknown account");
    assert!(matches!(err, VaultError::NotFound(_)));
}

#[test]
fn registry_works_over_sqlite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open(&dir.path().join("vault.db")).expect("open");

    let created = create_account(&store, "alice", "pw12345!").expect("signup");
    let vault_id = created.vault_id().to_string();
    drop(created);

    let session = verify_login(&store, "alice", "pw12345!").expect("login");
    assert_eq!(session.vault_id(), vault_id);
    assert!(matches!(
        verify_login(&store, "alice", "nope"),
        Err(VaultError::InvalidCredentials)
    ));
}
