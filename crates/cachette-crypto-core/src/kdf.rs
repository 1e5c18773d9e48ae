//! PBKDF2-HMAC-SHA256 key derivation.
//!
//! One derivation serves two purposes:
//! - [`derive_key`] — the 256-bit AES session key (never persisted)
//! - [`derive_verifier`] — the stored password check value
//!
//! Both come from a single 64-byte PBKDF2 output split in half, so the
//! verifier written to storage can never double as the encryption key.

use crate::error::CryptoError;
use crate::memory::SecretBytes;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::pbkdf2;
use std::num::NonZeroU32;
use zeroize::Zeroize;

/// PBKDF2 iteration count. Deliberately slow (hundreds of milliseconds
/// on commodity hardware) for brute-force resistance.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Required salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived encryption key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Password verifier length in bytes.
pub const VERIFIER_LEN: usize = 32;

/// Combined derivation output: key half followed by verifier half.
const DERIVED_LEN: usize = KEY_LEN + VERIFIER_LEN;

const ITERATIONS: NonZeroU32 = match NonZeroU32::new(PBKDF2_ITERATIONS) {
    Some(n) => n,
    None => panic!("PBKDF2_ITERATIONS must be non-zero"),
};

/// Run the full 64-byte PBKDF2 derivation.
///
/// The password may be empty; the salt must be exactly [`SALT_LEN`] bytes.
fn derive_block(password: &[u8], salt: &[u8]) -> Result<[u8; DERIVED_LEN], CryptoError> {
    if salt.len() != SALT_LEN {
        return Err(CryptoError::MalformedInput(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }

    let mut out = [0u8; DERIVED_LEN];
    pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA256, ITERATIONS, salt, password, &mut out);
    Ok(out)
}

/// Derive the 256-bit symmetric encryption key from a password and salt.
///
/// Deterministic: the same password and salt always yield the same key.
/// The key is returned in a zeroize-on-drop wrapper and must never be
/// written to storage.
///
/// # Errors
///
/// Returns `CryptoError::MalformedInput` if the salt is not 16 bytes.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<SecretBytes<KEY_LEN>, CryptoError> {
    let mut block = derive_block(password, salt)?;
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&block[..KEY_LEN]);
    block.zeroize();
    Ok(SecretBytes::new(key))
}

/// Derive the password verifier from a password and salt.
///
/// The verifier is safe to persist: it shares the KDF with [`derive_key`]
/// but occupies the opposite half of the output block, so equality of
/// verifiers reveals nothing about the encryption key.
///
/// # Errors
///
/// Returns `CryptoError::MalformedInput` if the salt is not 16 bytes.
pub fn derive_verifier(password: &[u8], salt: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut block = derive_block(password, salt)?;
    let verifier = block[KEY_LEN..].to_vec();
    block.zeroize();
    Ok(verifier)
}

/// Generate a fresh random 16-byte salt from the OS CSPRNG.
#[must_use]
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Check a password attempt against a stored verifier in constant time.
///
/// # Errors
///
/// Returns `CryptoError::MalformedInput` if the salt is not 16 bytes.
pub fn verify_password(
    password: &[u8],
    salt: &[u8],
    stored_verifier: &[u8],
) -> Result<bool, CryptoError> {
    let candidate = derive_verifier(password, salt)?;
    Ok(ring::constant_time::verify_slices_are_equal(&candidate, stored_verifier).is_ok())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
