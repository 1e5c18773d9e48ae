//! AES-256-GCM authenticated encryption.
//!
//! Every call to [`encrypt`] draws a fresh random 96-bit nonce from the
//! OS CSPRNG — nonce reuse under one key breaks GCM, so callers never
//! supply nonces. The nonce travels with the item's metadata; the
//! 128-bit tag is appended to the ciphertext, matching the layout the
//! vault persists (`ciphertext || tag` in one blob, nonce alongside).

use crate::error::CryptoError;
use crate::memory::SecretBuffer;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead;
use zeroize::Zeroize;

/// AES-256-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// AES-256-GCM key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Result of one encryption: the tagged ciphertext and the nonce that
/// must be stored with the item's metadata for later decryption.
#[must_use = "encrypted data must be stored or it is lost"]
#[derive(Clone, Debug)]
pub struct Sealed {
    /// 96-bit random nonce, unique to this encryption.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the 16-byte authentication tag appended.
    pub ciphertext: Vec<u8>,
}

fn aead_key(key: &[u8]) -> Result<aead::LessSafeKey, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::Encryption(format!(
            "invalid key length: {} bytes (expected {KEY_LEN})",
            key.len()
        )));
    }
    let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, key)
        .map_err(|_| CryptoError::Encryption("failed to create AES-256-GCM key".into()))?;
    Ok(aead::LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` (which may be empty) under a 32-byte key.
///
/// # Errors
///
/// Returns `CryptoError::Encryption` if the key is not exactly 32 bytes
/// or the seal operation fails.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Sealed, CryptoError> {
    let sealing_key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

    // Encrypt in place; the tag is appended to the buffer.
    let mut in_out = plaintext.to_vec();
    if sealing_key
        .seal_in_place_append_tag(nonce, aead::Aad::empty(), &mut in_out)
        .is_err()
    {
        in_out.zeroize();
        return Err(CryptoError::Encryption(
            "AES-256-GCM encryption failed".into(),
        ));
    }

    Ok(Sealed {
        nonce: nonce_bytes,
        ciphertext: in_out,
    })
}

/// Decrypt a `ciphertext || tag` blob with the key and its stored nonce.
///
/// # Errors
///
/// - `CryptoError::Encryption` if the key is not exactly 32 bytes
/// - `CryptoError::MalformedInput` if the nonce is not exactly 12 bytes
/// - `CryptoError::Decryption` if the tag does not verify (wrong key,
///   corrupted or truncated ciphertext) — never silent garbage
pub fn decrypt(ciphertext: &[u8], key: &[u8], nonce: &[u8]) -> Result<SecretBuffer, CryptoError> {
    let opening_key = aead_key(key)?;

    let nonce_arr: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| {
        CryptoError::MalformedInput(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        ))
    })?;
    let nonce = aead::Nonce::assume_unique_for_key(nonce_arr);

    let mut in_out = ciphertext.to_vec();
    let plaintext_slice = opening_key
        .open_in_place(nonce, aead::Aad::empty(), &mut in_out)
        .map_err(|_| CryptoError::Decryption)?;

    let result = SecretBuffer::new(plaintext_slice)
        .map_err(|e| CryptoError::SecureMemory(format!("secure buffer allocation failed: {e}")))?;
    in_out.zeroize();
    Ok(result)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
