//! Vault error types for `cachette-vault`.

use cachette_crypto_core::CryptoError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// An account already exists for this username (case-sensitive match).
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Login failed. Deliberately generic: callers cannot distinguish an
    /// unknown username from a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password reset failed: no such account, or the recovery phrase
    /// did not validate.
    #[error("invalid recovery phrase or unknown account")]
    InvalidPhraseOrAccount,

    /// No live session key — the operation requires an authenticated session.
    #[error("no active session: encryption key unavailable")]
    EncryptionUnavailable,

    /// Item, blob, or account not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Authentication tag mismatch — wrong key or corrupted ciphertext.
    /// An expected outcome after a recovery-based reset (old items stay
    /// bound to the old key), never a panic.
    #[error("decryption failed: wrong key or corrupted data")]
    DecryptionFailed,

    /// Storage backend read/write failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Structurally invalid data (bad encoding, non-UTF-8 plaintext,
    /// wrong nonce/salt length).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// File exceeds the maximum allowed size.
    #[error("file size {actual_bytes} bytes exceeds maximum {max_bytes} bytes")]
    FileSizeLimitExceeded {
        /// Maximum allowed size in bytes.
        max_bytes: usize,
        /// Actual file size in bytes.
        actual_bytes: usize,
    },

    /// Residual cryptographic failure (key derivation, cipher setup,
    /// secure memory, mnemonic machinery).
    #[error(transparent)]
    Crypto(CryptoError),
}

impl From<CryptoError> for VaultError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Decryption => Self::DecryptionFailed,
            CryptoError::MalformedInput(msg) => Self::MalformedInput(msg),
            other => Self::Crypto(other),
        }
    }
}

impl From<StoreError> for VaultError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
