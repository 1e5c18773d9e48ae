//! `cachette-crypto-core` — Pure cryptographic primitives for Cachette.
//!
//! This crate is the audit target: zero storage, zero I/O beyond the
//! OS CSPRNG. Key derivation, authenticated encryption, text encoding,
//! recovery mnemonics, and the secure-memory wrappers they return.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod encoding;
pub mod kdf;
pub mod mnemonic;
pub mod symmetric;

pub use encoding::{decode, encode};
pub use error::CryptoError;
pub use kdf::{
    derive_key, derive_verifier, generate_salt, verify_password, PBKDF2_ITERATIONS, SALT_LEN,
    VERIFIER_LEN,
};
pub use memory::{LockedRegion, SecretBuffer, SecretBytes};
pub use mnemonic::{generate_phrase, validate_phrase, WORD_COUNT};
pub use symmetric::{decrypt, encrypt, Sealed, KEY_LEN, NONCE_LEN, TAG_LEN};
