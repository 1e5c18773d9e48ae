//! Cryptographic error types for `cachette-crypto-core`.

use thiserror::Error;

/// Errors produced by cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed (PBKDF2 parameter validation).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Symmetric encryption failure (AES-256-GCM setup or seal).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Authentication tag verification failed — ciphertext tampered or wrong key.
    #[error("decryption failed: authentication tag mismatch")]
    Decryption,

    /// Structurally invalid input (wrong nonce/salt length, bad base64).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Recovery mnemonic generation or validation failure.
    #[error("mnemonic error: {0}")]
    Mnemonic(String),

    /// Secure memory allocation failure.
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}
