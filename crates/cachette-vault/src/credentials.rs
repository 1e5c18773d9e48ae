//! Encrypted credential storage — passwords, API keys, notes, and
//! other structured secrets.
//!
//! Storage protocol is identical to [`crate::files`]: one unencrypted
//! JSON index per vault plus a ciphertext blob per item. The decrypted
//! content is a tagged union: `Password`-kind items carry a structured
//! `{username, password, url, note}` payload; every other kind is an
//! opaque UTF-8 string.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use cachette_crypto_core::{encoding, symmetric};

use crate::error::VaultError;
use crate::ids::{generate_uuid, now_iso8601};
use crate::keys;
use crate::session::Session;
use crate::store::KeyValueStore;

// ---------------------------------------------------------------------------
// Credential kinds
// ---------------------------------------------------------------------------

/// Supported credential kinds. Serialized with display strings so the
/// stored index is readable and stable across implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialKind {
    /// Site/app login with structured content.
    Password,
    /// Opaque API key or token.
    #[serde(rename = "API Key")]
    ApiKey,
    /// Free-form encrypted note.
    #[serde(rename = "Secure Note")]
    SecureNote,
    /// Software license key.
    #[serde(rename = "License Key")]
    LicenseKey,
    /// Database connection secret.
    #[serde(rename = "Database Credential")]
    DatabaseCredential,
    /// SSH private key or passphrase.
    #[serde(rename = "SSH Key")]
    SshKey,
    /// Anything else.
    #[serde(rename = "Generic Secret")]
    GenericSecret,
}

impl CredentialKind {
    /// The stored/display string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "Password",
            Self::ApiKey => "API Key",
            Self::SecureNote => "Secure Note",
            Self::LicenseKey => "License Key",
            Self::DatabaseCredential => "Database Credential",
            Self::SshKey => "SSH Key",
            Self::GenericSecret => "Generic Secret",
        }
    }

    /// Parse a stored kind string.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MalformedInput`] for unknown kind strings.
    pub fn parse(s: &str) -> Result<Self, VaultError> {
        match s {
            "Password" => Ok(Self::Password),
            "API Key" => Ok(Self::ApiKey),
            "Secure Note" => Ok(Self::SecureNote),
            "License Key" => Ok(Self::LicenseKey),
            "Database Credential" => Ok(Self::DatabaseCredential),
            "SSH Key" => Ok(Self::SshKey),
            "Generic Secret" => Ok(Self::GenericSecret),
            other => Err(VaultError::MalformedInput(format!(
                "unknown credential kind: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata and content
// ---------------------------------------------------------------------------

/// Unencrypted index entry describing one stored credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialMetadata {
    /// Unique identifier (UUIDv4), stable across updates.
    pub id: String,
    /// Display name (e.g. "Gmail Login").
    pub name: String,
    /// Credential kind.
    #[serde(rename = "type")]
    pub kind: CredentialKind,
    /// Base64 nonce for this credential's ciphertext. Regenerated on
    /// every update.
    pub nonce: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// Structured content of a `Password`-kind credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordContent {
    /// Username or email for the site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// The password itself.
    pub password: String,
    /// Associated URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Drop for PasswordContent {
    fn drop(&mut self) {
        self.password.zeroize();
        if let Some(ref mut u) = self.username {
            u.zeroize();
        }
        if let Some(ref mut url) = self.url {
            url.zeroize();
        }
        if let Some(ref mut n) = self.note {
            n.zeroize();
        }
    }
}

/// Decrypted credential content.
///
/// `Password`-kind items decode to the structured variant when the
/// plaintext parses; anything else — including legacy `Password` items
/// stored as raw strings — decodes to `Text`.
#[derive(Debug, Clone)]
pub enum CredentialContent {
    /// Structured login payload.
    Password(PasswordContent),
    /// Opaque UTF-8 secret.
    Text(String),
}

impl Drop for CredentialContent {
    fn drop(&mut self) {
        // PasswordContent zeroizes itself; only the raw variant is ours.
        if let Self::Text(s) = self {
            s.zeroize();
        }
    }
}

fn serialize_content(content: &CredentialContent) -> Result<Vec<u8>, VaultError> {
    match content {
        CredentialContent::Password(p) => serde_json::to_vec(p).map_err(|e| {
            VaultError::MalformedInput(format!("failed to serialize password content: {e}"))
        }),
        CredentialContent::Text(s) => Ok(s.as_bytes().to_vec()),
    }
}

fn decode_content(kind: CredentialKind, plaintext: &[u8]) -> Result<CredentialContent, VaultError> {
    let text = std::str::from_utf8(plaintext)
        .map_err(|_| VaultError::MalformedInput("credential content is not UTF-8".into()))?;

    if kind == CredentialKind::Password {
        // Parse failure is not an error: pre-structured items stored the
        // raw string, and a read must never fail over the difference.
        if let Ok(parsed) = serde_json::from_str::<PasswordContent>(text) {
            return Ok(CredentialContent::Password(parsed));
        }
    }
    Ok(CredentialContent::Text(text.to_string()))
}

// ---------------------------------------------------------------------------
// Index helpers
// ---------------------------------------------------------------------------

fn load_index(
    store: &dyn KeyValueStore,
    vault_id: &str,
) -> Result<Vec<CredentialMetadata>, VaultError> {
    match store.get(&keys::credentials_index_key(vault_id))? {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| VaultError::Storage(format!("corrupt credentials index: {e}"))),
        None => Ok(Vec::new()),
    }
}

fn save_index(
    store: &dyn KeyValueStore,
    vault_id: &str,
    index: &[CredentialMetadata],
) -> Result<(), VaultError> {
    let json = serde_json::to_string(index)
        .map_err(|e| VaultError::Storage(format!("failed to serialize credentials index: {e}")))?;
    store.set(&keys::credentials_index_key(vault_id), &json)?;
    Ok(())
}

enum Lookup {
    Found(CredentialMetadata, Vec<u8>),
    MetadataOnly(CredentialMetadata),
    Missing,
}

fn lookup(
    store: &dyn KeyValueStore,
    vault_id: &str,
    credential_id: &str,
) -> Result<Lookup, VaultError> {
    let index = load_index(store, vault_id)?;
    let Some(meta) = index.into_iter().find(|m| m.id == credential_id) else {
        return Ok(Lookup::Missing);
    };
    match store.get(&keys::credential_blob_key(vault_id, credential_id))? {
        Some(blob_b64) => Ok(Lookup::Found(meta, encoding::decode(&blob_b64)?)),
        None => Ok(Lookup::MetadataOnly(meta)),
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// List a vault's credentials. Empty vec for a fresh vault; orphaned
/// index entries are pruned on rebuild.
///
/// # Errors
///
/// Returns [`VaultError::Storage`] on backend failure or a corrupt index.
pub fn list_credentials(
    store: &dyn KeyValueStore,
    vault_id: &str,
) -> Result<Vec<CredentialMetadata>, VaultError> {
    let index = load_index(store, vault_id)?;
    let total = index.len();

    let mut kept = Vec::with_capacity(total);
    for meta in index {
        if store
            .get(&keys::credential_blob_key(vault_id, &meta.id))?
            .is_some()
        {
            kept.push(meta);
        }
    }

    if kept.len() != total {
        tracing::debug!(
            vault_id,
            pruned = total.saturating_sub(kept.len()),
            "pruned orphaned credential index entries"
        );
        save_index(store, vault_id, &kept)?;
    }
    Ok(kept)
}

/// Encrypt and store a credential, returning its new index entry.
///
/// # Errors
///
/// - [`VaultError::Crypto`] if encryption fails
/// - [`VaultError::Storage`] if a backend write fails
pub fn add_credential(
    store: &dyn KeyValueStore,
    session: &Session,
    name: &str,
    kind: CredentialKind,
    content: &CredentialContent,
) -> Result<CredentialMetadata, VaultError> {
    let mut plaintext = serialize_content(content)?;
    let sealed = symmetric::encrypt(&plaintext, session.key())?;
    plaintext.zeroize();

    let id = generate_uuid();
    let vault_id = session.vault_id();

    store.set(
        &keys::credential_blob_key(vault_id, &id),
        &encoding::encode(&sealed.ciphertext),
    )?;

    let meta = CredentialMetadata {
        id,
        name: name.to_string(),
        kind,
        nonce: encoding::encode(&sealed.nonce),
        created_at: now_iso8601(),
    };

    let mut index = load_index(store, vault_id)?;
    index.push(meta.clone());
    save_index(store, vault_id, &index)?;

    Ok(meta)
}

/// Fetch and decrypt a credential's content.
///
/// # Errors
///
/// - [`VaultError::NotFound`] if the id is absent or its blob is missing
/// - [`VaultError::DecryptionFailed`] on tag mismatch
/// - [`VaultError::MalformedInput`] if the plaintext is not UTF-8
pub fn get_credential_content(
    store: &dyn KeyValueStore,
    session: &Session,
    credential_id: &str,
) -> Result<CredentialContent, VaultError> {
    match lookup(store, session.vault_id(), credential_id)? {
        Lookup::Found(meta, blob) => {
            let nonce = encoding::decode(&meta.nonce)?;
            let plaintext = symmetric::decrypt(&blob, session.key(), &nonce)?;
            decode_content(meta.kind, plaintext.expose())
        }
        Lookup::MetadataOnly(meta) => {
            tracing::debug!(credential_id = %meta.id, "credential blob missing for index entry");
            Err(VaultError::NotFound(format!("credential {credential_id}")))
        }
        Lookup::Missing => Err(VaultError::NotFound(format!("credential {credential_id}"))),
    }
}

/// Re-encrypt a credential with new content and replace its metadata
/// in place.
///
/// A fresh nonce is always generated — the key is unchanged, so reusing
/// the old nonce would break GCM. The id and creation timestamp are
/// stable across updates.
///
/// # Errors
///
/// - [`VaultError::NotFound`] if the id is absent from the index
/// - [`VaultError::Crypto`] / [`VaultError::Storage`] as for add
pub fn update_credential(
    store: &dyn KeyValueStore,
    session: &Session,
    credential_id: &str,
    new_name: &str,
    new_kind: CredentialKind,
    new_content: &CredentialContent,
) -> Result<CredentialMetadata, VaultError> {
    let vault_id = session.vault_id();
    let mut index = load_index(store, vault_id)?;
    let Some(pos) = index.iter().position(|m| m.id == credential_id) else {
        return Err(VaultError::NotFound(format!("credential {credential_id}")));
    };

    let mut plaintext = serialize_content(new_content)?;
    let sealed = symmetric::encrypt(&plaintext, session.key())?;
    plaintext.zeroize();

    store.set(
        &keys::credential_blob_key(vault_id, credential_id),
        &encoding::encode(&sealed.ciphertext),
    )?;

    let meta = &mut index[pos];
    meta.name = new_name.to_string();
    meta.kind = new_kind;
    meta.nonce = encoding::encode(&sealed.nonce);
    let updated = meta.clone();

    save_index(store, vault_id, &index)?;
    Ok(updated)
}

/// Delete a credential's blob and index entry together. Deleting an
/// unknown id is a successful no-op.
///
/// # Errors
///
/// Returns [`VaultError::Storage`] if a backend operation fails.
pub fn delete_credential(
    store: &dyn KeyValueStore,
    vault_id: &str,
    credential_id: &str,
) -> Result<(), VaultError> {
    store.remove(&keys::credential_blob_key(vault_id, credential_id))?;

    let index = load_index(store, vault_id)?;
    let total = index.len();
    let kept: Vec<CredentialMetadata> = index
        .into_iter()
        .filter(|m| m.id != credential_id)
        .collect();
    if kept.len() != total {
        save_index(store, vault_id, &kept)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
