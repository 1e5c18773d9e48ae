//! Encrypted file storage.
//!
//! Each vault keeps one unencrypted JSON index of [`FileMetadata`] and,
//! per file, a separate base64 ciphertext blob keyed by the file's id.
//! The index is the sole authority for what exists; blobs carry no
//! self-describing metadata. Writes go blob-first, then index: a blob
//! orphaned by an index failure is harmless garbage, whereas an index
//! entry without its blob would be a phantom file.

use serde::{Deserialize, Serialize};

use cachette_crypto_core::{encoding, symmetric};

use crate::error::VaultError;
use crate::ids::{generate_uuid, now_iso8601};
use crate::keys;
use crate::session::Session;
use crate::store::KeyValueStore;

/// Maximum file size: 10 MB.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Unencrypted index entry describing one stored file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Unique identifier (UUIDv4), stable for the file's lifetime.
    pub id: String,
    /// Original filename.
    pub name: String,
    /// MIME type as reported at upload.
    pub mime_type: String,
    /// Plaintext size in bytes.
    pub size: u64,
    /// Base64 nonce used for this file's ciphertext.
    pub nonce: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Index helpers
// ---------------------------------------------------------------------------

fn load_index(store: &dyn KeyValueStore, vault_id: &str) -> Result<Vec<FileMetadata>, VaultError> {
    match store.get(&keys::files_index_key(vault_id))? {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| VaultError::Storage(format!("corrupt files index: {e}"))),
        None => Ok(Vec::new()),
    }
}

fn save_index(
    store: &dyn KeyValueStore,
    vault_id: &str,
    index: &[FileMetadata],
) -> Result<(), VaultError> {
    let json = serde_json::to_string(index)
        .map_err(|e| VaultError::Storage(format!("failed to serialize files index: {e}")))?;
    store.set(&keys::files_index_key(vault_id), &json)?;
    Ok(())
}

/// Outcome of resolving an id against both the index and the blob space.
/// `MetadataOnly` (an orphaned index entry) collapses to `NotFound` at
/// the public boundary but stays distinct here so the invariant is
/// testable.
enum Lookup {
    Found(FileMetadata, Vec<u8>),
    MetadataOnly(FileMetadata),
    Missing,
}

fn lookup(
    store: &dyn KeyValueStore,
    vault_id: &str,
    file_id: &str,
) -> Result<Lookup, VaultError> {
    let index = load_index(store, vault_id)?;
    let Some(meta) = index.into_iter().find(|m| m.id == file_id) else {
        return Ok(Lookup::Missing);
    };
    match store.get(&keys::file_blob_key(vault_id, file_id))? {
        Some(blob_b64) => Ok(Lookup::Found(meta, encoding::decode(&blob_b64)?)),
        None => Ok(Lookup::MetadataOnly(meta)),
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// List a vault's files. Empty vec (not an error) for a fresh vault.
///
/// Index entries whose ciphertext blob has gone missing are pruned from
/// the rebuilt index — an orphan is treated as already deleted.
///
/// # Errors
///
/// Returns [`VaultError::Storage`] on backend failure or a corrupt index.
pub fn list_files(
    store: &dyn KeyValueStore,
    vault_id: &str,
) -> Result<Vec<FileMetadata>, VaultError> {
    let index = load_index(store, vault_id)?;
    let total = index.len();

    let mut kept = Vec::with_capacity(total);
    for meta in index {
        if store.get(&keys::file_blob_key(vault_id, &meta.id))?.is_some() {
            kept.push(meta);
        }
    }

    if kept.len() != total {
        tracing::debug!(
            vault_id,
            pruned = total.saturating_sub(kept.len()),
            "pruned orphaned file index entries"
        );
        save_index(store, vault_id, &kept)?;
    }
    Ok(kept)
}

/// Encrypt and store a file, returning its new index entry.
///
/// # Errors
///
/// - [`VaultError::FileSizeLimitExceeded`] for data over 10 MB
/// - [`VaultError::Crypto`] if encryption fails
/// - [`VaultError::Storage`] if a backend write fails
pub fn put_file(
    store: &dyn KeyValueStore,
    session: &Session,
    name: &str,
    mime_type: &str,
    data: &[u8],
) -> Result<FileMetadata, VaultError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(VaultError::FileSizeLimitExceeded {
            max_bytes: MAX_FILE_SIZE,
            actual_bytes: data.len(),
        });
    }

    let sealed = symmetric::encrypt(data, session.key())?;
    let id = generate_uuid();
    let vault_id = session.vault_id();

    store.set(
        &keys::file_blob_key(vault_id, &id),
        &encoding::encode(&sealed.ciphertext),
    )?;

    let meta = FileMetadata {
        id,
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size: data.len() as u64,
        nonce: encoding::encode(&sealed.nonce),
        created_at: now_iso8601(),
    };

    let mut index = load_index(store, vault_id)?;
    index.push(meta.clone());
    save_index(store, vault_id, &index)?;

    Ok(meta)
}

/// Fetch and decrypt a file.
///
/// The returned bytes are plaintext; the caller should zeroize them
/// when done.
///
/// # Errors
///
/// - [`VaultError::NotFound`] if the id is absent from the index, or
///   present but the blob is missing (orphan)
/// - [`VaultError::DecryptionFailed`] on tag mismatch — e.g. items
///   written before a recovery-based password reset
pub fn get_file(
    store: &dyn KeyValueStore,
    session: &Session,
    file_id: &str,
) -> Result<(FileMetadata, Vec<u8>), VaultError> {
    match lookup(store, session.vault_id(), file_id)? {
        Lookup::Found(meta, blob) => {
            let nonce = encoding::decode(&meta.nonce)?;
            let plaintext = symmetric::decrypt(&blob, session.key(), &nonce)?;
            Ok((meta, plaintext.expose().to_vec()))
        }
        Lookup::MetadataOnly(meta) => {
            tracing::debug!(file_id = %meta.id, "file blob missing for index entry");
            Err(VaultError::NotFound(format!("file {file_id}")))
        }
        Lookup::Missing => Err(VaultError::NotFound(format!("file {file_id}"))),
    }
}

/// Delete a file's blob and index entry together.
///
/// Deleting an id that does not exist is a successful no-op, matching
/// the index-vs-blob eventual-consistency posture.
///
/// # Errors
///
/// Returns [`VaultError::Storage`] if a backend operation fails.
pub fn delete_file(
    store: &dyn KeyValueStore,
    vault_id: &str,
    file_id: &str,
) -> Result<(), VaultError> {
    store.remove(&keys::file_blob_key(vault_id, file_id))?;

    let index = load_index(store, vault_id)?;
    let total = index.len();
    let kept: Vec<FileMetadata> = index.into_iter().filter(|m| m.id != file_id).collect();
    if kept.len() != total {
        save_index(store, vault_id, &kept)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MIME type helper
// ---------------------------------------------------------------------------

/// Infer a MIME type from a filename extension.
///
/// Falls back to `application/octet-stream` for unknown extensions.
#[must_use]
pub fn mime_from_filename(filename: &str) -> &'static str {
    match filename
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("txt" | "text") => "text/plain",
        Some("md") => "text/markdown",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("zip") => "application/zip",
        Some("key" | "pem" | "crt" | "cer") => "application/x-pem-file",
        Some("p12" | "pfx") => "application/x-pkcs12",
        Some("gpg" | "asc") => "application/pgp-encrypted",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
