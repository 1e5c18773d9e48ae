//! Recovery-phrase password reset.
//!
//! A valid phrase authorizes replacing an account's salt and verifier
//! with material derived from a new password. The vault's existing
//! items are NOT re-encrypted: they stay bound to the old key and will
//! read back as `DecryptionFailed` until (unless) the old password is
//! recovered. That trade-off is deliberate and covered by tests —
//! changing it means adding an explicit re-encryption migration, not
//! quietly altering this function.

use cachette_crypto_core::{encoding, kdf, mnemonic};

use crate::accounts;
use crate::error::VaultError;
use crate::ids::generate_uuid;
use crate::keys;
use crate::session::Session;
use crate::store::KeyValueStore;

/// Generate a fresh 12-word recovery phrase.
///
/// The phrase is returned once and stored nowhere. The caller owns the
/// job of making sure the user records it.
///
/// # Errors
///
/// Returns [`VaultError::Crypto`] if entropy encoding fails.
pub fn generate_recovery_phrase() -> Result<String, VaultError> {
    Ok(mnemonic::generate_phrase()?)
}

/// Reset an account's password, authorized by a recovery phrase.
///
/// Replaces the stored salt and verifier, regenerates the vault id only
/// if it went missing, and returns a session under the new key.
///
/// # Errors
///
/// - [`VaultError::InvalidPhraseOrAccount`] if the account does not
///   exist or the phrase fails BIP-39 validation
/// - [`VaultError::Storage`] if a backend write fails
pub fn reset_password(
    store: &dyn KeyValueStore,
    username: &str,
    phrase: &str,
    new_password: &str,
) -> Result<Session, VaultError> {
    if !accounts::account_exists(store, username)? {
        return Err(VaultError::InvalidPhraseOrAccount);
    }
    if mnemonic::validate_phrase(phrase).is_err() {
        return Err(VaultError::InvalidPhraseOrAccount);
    }

    let salt = kdf::generate_salt();
    let verifier = kdf::derive_verifier(new_password.as_bytes(), &salt)?;
    store.set(&keys::verifier_key(username), &encoding::encode(&verifier))?;
    store.set(&keys::salt_key(username), &encoding::encode(&salt))?;

    let vault_id = match store.get(&keys::vault_id_key(username))? {
        Some(vault_id) => vault_id,
        None => {
            // An account should always carry a vault id; repair if it
            // was lost rather than stranding the reset.
            let vault_id = generate_uuid();
            tracing::warn!(username, "vault id missing during reset; regenerated");
            store.set(&keys::vault_id_key(username), &vault_id)?;
            vault_id
        }
    };

    let key = kdf::derive_key(new_password.as_bytes(), &salt)?;
    Ok(Session::new(username.to_string(), vault_id, key))
}
