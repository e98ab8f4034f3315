//! Secret detection and redaction utilities.
//!
//! Log adapters run every structured field name through `is_secret_key`
//! before emitting it.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a key/variable name likely refers to a secret.
///
/// # Examples
///
/// ```
/// use ragpolicy_shared::is_secret_key;
///
/// assert!(is_secret_key("AZURE_BLOB_ACCOUNT_KEY"));
/// assert!(is_secret_key("sasToken"));
/// assert!(!is_secret_key("documentType"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    ["KEY", "TOKEN", "SECRET", "PASSWORD", "CREDENTIAL", "CONNECTION_STRING"]
        .iter()
        .any(|marker| key.contains(marker))
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use ragpolicy_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("ACCOUNT_KEY", "abc"), "[REDACTED]");
/// assert_eq!(redact_if_secret("container", "config"), "config");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
