//! Account registry — the mapping from a username to its password
//! verifier, salt, and vault id.
//!
//! The registry never stores the password or the encryption key: only
//! the salt and the verifier half of the PBKDF2 output are persisted.
//! Usernames are case-sensitive and discovered by enumerating the
//! backend's keys, so the registry needs no index of its own.

use cachette_crypto_core::{encoding, kdf};

use crate::error::VaultError;
use crate::ids::generate_uuid;
use crate::keys;
use crate::session::Session;
use crate::store::KeyValueStore;

/// Whether an account exists for `username` (exact, case-sensitive).
///
/// # Errors
///
/// Returns [`VaultError::Storage`] if the backend read fails.
pub fn account_exists(store: &dyn KeyValueStore, username: &str) -> Result<bool, VaultError> {
    Ok(store.get(&keys::verifier_key(username))?.is_some())
}

/// Create an account and return its live session.
///
/// Generates a random salt and a fresh vault id, derives and persists
/// the verifier, and derives the session key — signup logs the new
/// account in, exactly like a successful login would.
///
/// # Errors
///
/// - [`VaultError::UsernameTaken`] if the username is already registered
/// - [`VaultError::Storage`] if a backend write fails
pub fn create_account(
    store: &dyn KeyValueStore,
    username: &str,
    password: &str,
) -> Result<Session, VaultError> {
    if account_exists(store, username)? {
        return Err(VaultError::UsernameTaken(username.to_string()));
    }

    let salt = kdf::generate_salt();
    let verifier = kdf::derive_verifier(password.as_bytes(), &salt)?;
    let vault_id = generate_uuid();

    store.set(&keys::verifier_key(username), &encoding::encode(&verifier))?;
    store.set(&keys::salt_key(username), &encoding::encode(&salt))?;
    store.set(&keys::vault_id_key(username), &vault_id)?;

    let key = kdf::derive_key(password.as_bytes(), &salt)?;
    Ok(Session::new(username.to_string(), vault_id, key))
}

/// Verify a password attempt and return a live session on success.
///
/// The failure is generic on purpose: a missing account and a wrong
/// password are indistinguishable to the caller.
///
/// # Errors
///
/// - [`VaultError::InvalidCredentials`] on unknown username or password
///   mismatch
/// - [`VaultError::Storage`] / [`VaultError::MalformedInput`] if the
///   stored material cannot be read or decoded
pub fn verify_login(
    store: &dyn KeyValueStore,
    username: &str,
    password: &str,
) -> Result<Session, VaultError> {
    let stored_verifier = store.get(&keys::verifier_key(username))?;
    let stored_salt = store.get(&keys::salt_key(username))?;
    let stored_vault_id = store.get(&keys::vault_id_key(username))?;

    let (Some(verifier_b64), Some(salt_b64), Some(vault_id)) =
        (stored_verifier, stored_salt, stored_vault_id)
    else {
        return Err(VaultError::InvalidCredentials);
    };

    let salt = encoding::decode(&salt_b64)?;
    let verifier = encoding::decode(&verifier_b64)?;

    if !kdf::verify_password(password.as_bytes(), &salt, &verifier)? {
        return Err(VaultError::InvalidCredentials);
    }

    let key = kdf::derive_key(password.as_bytes(), &salt)?;
    Ok(Session::new(username.to_string(), vault_id, key))
}

/// Enumerate every registered username. Order is unspecified.
///
/// # Errors
///
/// Returns [`VaultError::Storage`] if the backend enumeration fails.
pub fn list_usernames(store: &dyn KeyValueStore) -> Result<Vec<String>, VaultError> {
    Ok(store
        .keys()?
        .iter()
        .filter_map(|key| keys::username_from_verifier_key(key))
        .map(ToString::to_string)
        .collect())
}

/// Delete an account: its credential-verification material and every
/// key under its vault's namespace.
///
/// Cleanup is best-effort per key. Failures are logged and the
/// operation reports them as a [`VaultError::Storage`] error rather
/// than pretending the purge completed.
///
/// # Errors
///
/// - [`VaultError::NotFound`] if no account exists for `username`
/// - [`VaultError::Storage`] if enumeration fails or any key could not
///   be removed
pub fn delete_account(store: &dyn KeyValueStore, username: &str) -> Result<(), VaultError> {
    if !account_exists(store, username)? {
        return Err(VaultError::NotFound(format!("account {username}")));
    }

    let vault_id = store.get(&keys::vault_id_key(username))?;

    let mut doomed = vec![
        keys::verifier_key(username),
        keys::salt_key(username),
        keys::vault_id_key(username),
    ];
    if let Some(vault_id) = vault_id {
        let prefix = keys::vault_prefix(&vault_id);
        doomed.extend(
            store
                .keys()?
                .into_iter()
                .filter(|key| key.starts_with(&prefix)),
        );
    }

    let mut failed = 0usize;
    for key in &doomed {
        if let Err(err) = store.remove(key) {
            tracing::warn!(%key, error = %err, "account deletion: failed to remove key");
            failed = failed.saturating_add(1);
        }
    }

    if failed > 0 {
        return Err(VaultError::Storage(format!(
            "account deletion incomplete: {failed} of {} keys not removed",
            doomed.len()
        )));
    }
    Ok(())
}
