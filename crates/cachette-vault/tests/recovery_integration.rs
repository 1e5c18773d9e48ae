#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for recovery-phrase password reset.
//!
//! The central pinned behavior: a reset re-keys the account WITHOUT
//! re-encrypting existing items, so pre-reset items become unreadable
//! (`DecryptionFailed`). If re-encryption is ever added, these tests
//! must change deliberately.

use cachette_vault::error::VaultError;
use cachette_vault::{
    add_credential, create_account, generate_recovery_phrase, get_credential_content, get_file,
    list_files, put_file, reset_password, verify_login, CredentialContent, CredentialKind,
    MemoryStore,
};

#[test]
fn generated_phrase_is_twelve_words() {
    let phrase = generate_recovery_phrase().expect("generate");
    assert_eq!(phrase.split(' ').count(), 12);
}

#[test]
fn reset_replaces_the_password() {
    let store = MemoryStore::new();
    create_account(&store, "alice", "old-password").expect("signup");

    let phrase = generate_recovery_phrase().expect("generate");
    let session = reset_password(&store, "alice", &phrase, "new-password").expect("reset");
    assert_eq!(session.username(), "alice");

    // Old password is dead, new one works.
    assert!(matches!(
        verify_login(&store, "alice", "old-password"),
        Err(VaultError::InvalidCredentials)
    ));
    verify_login(&store, "alice", "new-password").expect("login with new password");
}

#[test]
fn reset_preserves_the_vault_id() {
    let store = MemoryStore::new();
    let original = create_account(&store, "alice", "old-password").expect("signup");
    let vault_id = original.vault_id().to_string();
    drop(original);

    let phrase = generate_recovery_phrase().expect("generate");
    let session = reset_password(&store, "alice", &phrase, "new-password").expect("reset");
    assert_eq!(session.vault_id(), vault_id);
}

#[test]
fn invalid_phrase_is_rejected() {
    let store = MemoryStore::new();
    create_account(&store, "alice", "pw").expect("signup");

    // Checksum-broken phrase.
    let bad = "abandon abandon abandon abandon abandon abandon \
               abandon abandon abandon abandon abandon zoo";
    let err = reset_password(&store, "alice", bad, "new-pw").expect_err("bad phrase");
    assert!(matches!(err, VaultError::InvalidPhraseOrAccount));

    // Not a phrase at all.
    let err = reset_password(&store, "alice", "not a mnemonic", "new-pw").expect_err("garbage");
    assert!(matches!(err, VaultError::InvalidPhraseOrAccount));
}

#[test]
fn reset_for_unknown_account_is_rejected() {
    let store = MemoryStore::new();
    let phrase = generate_recovery_phrase().expect("generate");
    let err = reset_password(&store, "ghost", &phrase, "new-pw").expect_err("unknown account");
    assert!(matches!(err, VaultError::InvalidPhraseOrAccount));
}

#[test]
fn items_created_before_reset_fail_decryption_afterwards() {
    let store = MemoryStore::new();
    let session = create_account(&store, "alice", "old-password").expect("signup");

    let file_meta =
        put_file(&store, &session, "doc.txt", "text/plain", b"pre-reset bytes").expect("put");
    let cred_meta = add_credential(
        &store,
        &session,
        "Gmail",
        CredentialKind::Password,
        &CredentialContent::Text("hunter2".into()),
    )
    .expect("add");
    drop(session);

    let phrase = generate_recovery_phrase().expect("generate");
    let new_session = reset_password(&store, "alice", &phrase, "new-password").expect("reset");

    // The items still exist in the index...
    assert_eq!(
        list_files(&store, new_session.vault_id()).expect("list").len(),
        1
    );

    // ...but their ciphertext is bound to the old key. This is the
    // documented trade-off of recovery without re-encryption, not a bug.
    let err = get_file(&store, &new_session, &file_meta.id).expect_err("old file unreadable");
    assert!(matches!(err, VaultError::DecryptionFailed));

    let err = get_credential_content(&store, &new_session, &cred_meta.id)
        .expect_err("old credential unreadable");
    assert!(matches!(err, VaultError::DecryptionFailed));
}

#[test]
fn items_created_after_reset_read_back_fine() {
    let store = MemoryStore::new();
    create_account(&store, "alice", "old-password").expect("signup");

    let phrase = generate_recovery_phrase().expect("generate");
    let session = reset_password(&store, "alice", &phrase, "new-password").expect("reset");

    let meta = put_file(&store, &session, "fresh.txt", "text/plain", b"post-reset").expect("put");
    let (_, plaintext) = get_file(&store, &session, &meta.id).expect("get");
    assert_eq!(plaintext, b"post-reset");
}

#[test]
fn phrases_are_single_use_tokens_nowhere_stored() {
    use cachette_vault::KeyValueStore;

    let store = MemoryStore::new();
    create_account(&store, "alice", "pw").expect("signup");
    let phrase = generate_recovery_phrase().expect("generate");
    reset_password(&store, "alice", &phrase, "new-pw").expect("reset");

    // The phrase never touches the backend.
    for key in store.keys().expect("keys") {
        let value = store.get(&key).expect("get").unwrap_or_default();
        assert!(!value.contains(&phrase), "phrase leaked into {key}");
    }
}
