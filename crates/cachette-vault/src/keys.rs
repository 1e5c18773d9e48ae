//! Storage key namespaces.
//!
//! Account material is keyed by username; vault content is keyed by the
//! account's vault id. The two prefixes never overlap, so account keys
//! and vault keys cannot collide by construction.

/// Key holding the username of the most recently authenticated account.
/// A non-secret convenience — the derived key is never stored.
pub const ACTIVE_USERNAME_KEY: &str = "cachette_active_username";

const USER_PREFIX: &str = "cachette_user_";
const VERIFIER_SUFFIX: &str = "_password_verifier";
const SALT_SUFFIX: &str = "_salt";
const VAULT_ID_SUFFIX: &str = "_vault_id";

const VAULT_PREFIX: &str = "cachette_vault_";

pub(crate) fn verifier_key(username: &str) -> String {
    format!("{USER_PREFIX}{username}{VERIFIER_SUFFIX}")
}

pub(crate) fn salt_key(username: &str) -> String {
    format!("{USER_PREFIX}{username}{SALT_SUFFIX}")
}

pub(crate) fn vault_id_key(username: &str) -> String {
    format!("{USER_PREFIX}{username}{VAULT_ID_SUFFIX}")
}

/// Prefix under which every key of one vault lives. Used for bulk
/// deletion when an account is destroyed.
pub(crate) fn vault_prefix(vault_id: &str) -> String {
    format!("{VAULT_PREFIX}{vault_id}_")
}

pub(crate) fn files_index_key(vault_id: &str) -> String {
    format!("{VAULT_PREFIX}{vault_id}_files_metadata")
}

pub(crate) fn file_blob_key(vault_id: &str, file_id: &str) -> String {
    format!("{VAULT_PREFIX}{vault_id}_file_{file_id}")
}

pub(crate) fn credentials_index_key(vault_id: &str) -> String {
    format!("{VAULT_PREFIX}{vault_id}_credentials_metadata")
}

pub(crate) fn credential_blob_key(vault_id: &str, credential_id: &str) -> String {
    format!("{VAULT_PREFIX}{vault_id}_credential_content_{credential_id}")
}

/// Recover the username from a verifier key, if the key is one.
/// Used to enumerate accounts from the raw key listing.
pub(crate) fn username_from_verifier_key(key: &str) -> Option<&str> {
    key.strip_prefix(USER_PREFIX)?.strip_suffix(VERIFIER_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_keys_embed_username() {
        assert_eq!(
            verifier_key("alice"),
            "cachette_user_alice_password_verifier"
        );
        assert_eq!(salt_key("alice"), "cachette_user_alice_salt");
        assert_eq!(vault_id_key("alice"), "cachette_user_alice_vault_id");
    }

    #[test]
    fn vault_keys_share_the_vault_prefix() {
        let prefix = vault_prefix("v-1");
        assert!(files_index_key("v-1").starts_with(&prefix));
        assert!(file_blob_key("v-1", "f-9").starts_with(&prefix));
        assert!(credentials_index_key("v-1").starts_with(&prefix));
        assert!(credential_blob_key("v-1", "c-9").starts_with(&prefix));
    }

    #[test]
    fn username_roundtrips_through_verifier_key() {
        let key = verifier_key("Bob");
        assert_eq!(username_from_verifier_key(&key), Some("Bob"));
        assert_eq!(username_from_verifier_key("cachette_vault_x_file_y"), None);
        assert_eq!(username_from_verifier_key("cachette_user_bob_salt"), None);
    }

    #[test]
    fn account_and_vault_namespaces_are_disjoint() {
        assert!(!verifier_key("x").starts_with(VAULT_PREFIX));
        assert!(!files_index_key("x").starts_with(USER_PREFIX));
    }
}
