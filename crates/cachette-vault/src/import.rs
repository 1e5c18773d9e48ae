//! Bulk credential import.
//!
//! Takes rows already parsed by the caller (CSV parsing is a UI-layer
//! concern) and adds each as a `Password`-kind credential. Unlike the
//! single-item operations, the batch is partial-failure tolerant: one
//! bad row never aborts the rest, and every per-row failure is
//! collected into the report.

use serde::Serialize;
use zeroize::Zeroize;

use crate::credentials::{self, CredentialContent, CredentialKind, PasswordContent};
use crate::error::VaultError;
use crate::session::Session;
use crate::store::KeyValueStore;

/// One parsed import row. `name` and `password` are required; empty
/// optional fields should be `None`, not empty strings.
#[derive(Debug, Clone, Default)]
pub struct ImportRecord {
    /// Credential display name.
    pub name: String,
    /// Username or login.
    pub username: Option<String>,
    /// The password.
    pub password: String,
    /// Site URL.
    pub url: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

impl Drop for ImportRecord {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Rows stored successfully.
    pub success_count: usize,
    /// Rows that failed validation or storage.
    pub error_count: usize,
    /// One message per failed row, in input order.
    pub errors: Vec<String>,
}

/// Import credentials in bulk. Each record is validated and stored
/// independently; failures are reported, never fatal to the batch.
pub fn import_credentials(
    store: &dyn KeyValueStore,
    session: &Session,
    records: &[ImportRecord],
) -> ImportReport {
    let mut success_count = 0usize;
    let mut errors = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let row = i.saturating_add(1);

        if record.name.trim().is_empty() {
            errors.push(format!("record {row}: missing required field \"name\""));
            continue;
        }
        if record.password.is_empty() {
            errors.push(format!("record {row}: missing required field \"password\""));
            continue;
        }

        let content = CredentialContent::Password(PasswordContent {
            username: record.username.clone().filter(|s| !s.is_empty()),
            password: record.password.clone(),
            url: record.url.clone().filter(|s| !s.is_empty()),
            note: record.note.clone().filter(|s| !s.is_empty()),
        });

        match credentials::add_credential(
            store,
            session,
            &record.name,
            CredentialKind::Password,
            &content,
        ) {
            Ok(_) => success_count = success_count.saturating_add(1),
            Err(err) => errors.push(format!("record {row}: {err}")),
        }
    }

    let report = ImportReport {
        success_count,
        error_count: errors.len(),
        errors,
    };
    tracing::info!(
        success = report.success_count,
        failed = report.error_count,
        "credential import finished"
    );
    report
}
