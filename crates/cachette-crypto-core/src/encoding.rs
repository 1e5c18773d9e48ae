//! Binary ⇄ text transforms for the string-keyed storage backend.
//!
//! Ciphertext, nonces, salts, and verifiers are all raw bytes; the
//! storage contract only moves strings. Standard base64 (RFC 4648 with
//! padding) bridges the two, losslessly in both directions.

use crate::error::CryptoError;
use data_encoding::BASE64;

/// Encode raw bytes as base64 text.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode base64 text back into raw bytes.
///
/// # Errors
///
/// Returns `CryptoError::MalformedInput` if the text is not valid
/// padded base64.
pub fn decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    BASE64
        .decode(text.as_bytes())
        .map_err(|e| CryptoError::MalformedInput(format!("invalid base64: {e}")))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
