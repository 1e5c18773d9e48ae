//! BIP-39 recovery phrase generation and validation.
//!
//! A recovery phrase is 12 lowercase English words encoding 128 bits of
//! fresh entropy plus a 4-bit SHA-256 checksum. This module is
//! stateless: phrases are generated, shown to the user once, and never
//! persisted — losing the phrase and the password together makes the
//! vault's data unrecoverable, by design.

use crate::error::CryptoError;
use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

/// Number of words in a generated recovery phrase.
pub const WORD_COUNT: usize = 12;

/// Entropy behind a 12-word phrase, in bytes (128 bits).
const ENTROPY_LEN: usize = 16;

/// Generate a fresh 12-word recovery phrase from the OS CSPRNG.
///
/// Each call draws new entropy; the caller is responsible for making
/// sure the user records the phrase before it goes out of scope.
///
/// # Errors
///
/// Returns `CryptoError::Mnemonic` if the entropy cannot be encoded
/// (cannot happen for a well-formed 16-byte input).
pub fn generate_phrase() -> Result<String, CryptoError> {
    let mut entropy = [0u8; ENTROPY_LEN];
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy(&entropy)
        .map_err(|e| CryptoError::Mnemonic(format!("entropy encoding failed: {e}")))?;
    entropy.zeroize();

    Ok(mnemonic.to_string())
}

/// Validate a recovery phrase: word membership and checksum.
///
/// Accepts any standard BIP-39 word count; generated phrases are always
/// 12 words. Words must be lowercase and space-separated.
///
/// # Errors
///
/// Returns `CryptoError::Mnemonic` if any word is outside the English
/// wordlist, the word count is invalid, or the checksum does not match.
pub fn validate_phrase(phrase: &str) -> Result<(), CryptoError> {
    Mnemonic::parse(phrase)
        .map(|_| ())
        .map_err(|e| CryptoError::Mnemonic(format!("invalid recovery phrase: {e}")))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
