//! `cachette-vault` — Vault business logic for Cachette.
//!
//! Accounts, sessions, recovery, and the encrypted file/credential
//! stores, all over a narrow string key-value storage contract. The
//! cryptography itself lives in `cachette-crypto-core`; nothing in this
//! crate persists plaintext or key material.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod store;

pub mod accounts;
pub mod session;

pub mod recovery;

pub mod credentials;
pub mod files;

pub mod import;

mod ids;
mod keys;

pub use accounts::{
    account_exists, create_account, delete_account, list_usernames, verify_login,
};
pub use credentials::{
    add_credential, delete_credential, get_credential_content, list_credentials,
    update_credential, CredentialContent, CredentialKind, CredentialMetadata, PasswordContent,
};
pub use error::VaultError;
pub use files::{
    delete_file, get_file, list_files, mime_from_filename, put_file, FileMetadata, MAX_FILE_SIZE,
};
pub use import::{import_credentials, ImportRecord, ImportReport};
pub use keys::ACTIVE_USERNAME_KEY;
pub use recovery::{generate_recovery_phrase, reset_password};
pub use session::{remembered_username, Session, SessionGuard};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
