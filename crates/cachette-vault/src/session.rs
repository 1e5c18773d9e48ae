//! Session state — the only place the derived key lives.
//!
//! A [`Session`] is an explicit value, not a global: it is constructed
//! exclusively by login, signup, or password reset, passed into every
//! item-store call that needs the key, and zeroized when dropped. The
//! key is never persisted — a process restart always requires the
//! password again, even when the username was remembered.

use std::fmt;

use cachette_crypto_core::memory::SecretBytes;

use crate::accounts;
use crate::error::VaultError;
use crate::keys::ACTIVE_USERNAME_KEY;
use crate::recovery;
use crate::store::KeyValueStore;

/// An authenticated session: the account identity plus the live
/// symmetric key derived from its master password.
pub struct Session {
    username: String,
    vault_id: String,
    key: SecretBytes<32>,
}

impl Session {
    pub(crate) fn new(username: String, vault_id: String, key: SecretBytes<32>) -> Self {
        Self {
            username,
            vault_id,
            key,
        }
    }

    /// The account this session belongs to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The vault this session unlocks.
    #[must_use]
    pub fn vault_id(&self) -> &str {
        &self.vault_id
    }

    /// The live encryption key. Crate-internal: only the item stores
    /// may read it, and never cache it.
    pub(crate) fn key(&self) -> &[u8] {
        self.key.expose()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("vault_id", &self.vault_id)
            .field("key", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Owns the current session, if any: `LoggedOut` is `None`,
/// `Authenticated` is `Some`. The authenticating transition is the
/// duration of the (deliberately slow) KDF call inside the auth methods.
#[derive(Debug, Default)]
pub struct SessionGuard {
    active: Option<Session>,
}

impl SessionGuard {
    /// Start logged out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is live.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.active.is_some()
    }

    /// Borrow the live session.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::EncryptionUnavailable`] when logged out.
    pub fn session(&self) -> Result<&Session, VaultError> {
        self.active.as_ref().ok_or(VaultError::EncryptionUnavailable)
    }

    /// Create an account and establish its session.
    ///
    /// # Errors
    ///
    /// Propagates [`accounts::create_account`] failures; the previous
    /// session (if any) is kept on failure.
    pub fn sign_up(
        &mut self,
        store: &dyn KeyValueStore,
        username: &str,
        password: &str,
    ) -> Result<(), VaultError> {
        let session = accounts::create_account(store, username, password)?;
        self.install(store, session);
        Ok(())
    }

    /// Verify a password and establish a session.
    ///
    /// # Errors
    ///
    /// Propagates [`accounts::verify_login`] failures; the previous
    /// session (if any) is kept on failure.
    pub fn log_in(
        &mut self,
        store: &dyn KeyValueStore,
        username: &str,
        password: &str,
    ) -> Result<(), VaultError> {
        let session = accounts::verify_login(store, username, password)?;
        self.install(store, session);
        Ok(())
    }

    /// Re-key an account via its recovery phrase and establish a session
    /// under the new password.
    ///
    /// # Errors
    ///
    /// Propagates [`recovery::reset_password`] failures.
    pub fn reset_password(
        &mut self,
        store: &dyn KeyValueStore,
        username: &str,
        phrase: &str,
        new_password: &str,
    ) -> Result<(), VaultError> {
        let session = recovery::reset_password(store, username, phrase, new_password)?;
        self.install(store, session);
        Ok(())
    }

    /// Drop the session and forget the remembered username.
    ///
    /// Never fails: the key is cleared unconditionally; a storage
    /// failure while clearing the remembered username is only logged.
    pub fn log_out(&mut self, store: &dyn KeyValueStore) {
        self.active = None;
        if let Err(err) = store.remove(ACTIVE_USERNAME_KEY) {
            tracing::warn!(error = %err, "failed to clear remembered username");
        }
    }

    /// Delete an account and its entire vault. If the deleted account is
    /// the one currently logged in, the session ends as well.
    ///
    /// # Errors
    ///
    /// Propagates [`accounts::delete_account`] failures. The session is
    /// terminated before the purge so a partial cleanup cannot leave a
    /// live key for a half-deleted vault.
    pub fn delete_account(
        &mut self,
        store: &dyn KeyValueStore,
        username: &str,
    ) -> Result<(), VaultError> {
        if self
            .active
            .as_ref()
            .is_some_and(|s| s.username() == username)
        {
            self.log_out(store);
        }
        accounts::delete_account(store, username)
    }

    fn install(&mut self, store: &dyn KeyValueStore, session: Session) {
        if let Err(err) = store.set(ACTIVE_USERNAME_KEY, session.username()) {
            tracing::warn!(error = %err, "failed to remember active username");
        }
        self.active = Some(session);
    }
}

/// Read the username remembered by the last successful authentication,
/// if any. Convenience only — no key material is ever restored.
///
/// # Errors
///
/// Returns [`VaultError::Storage`] if the backend read fails.
pub fn remembered_username(store: &dyn KeyValueStore) -> Result<Option<String>, VaultError> {
    Ok(store.get(ACTIVE_USERNAME_KEY)?)
}
