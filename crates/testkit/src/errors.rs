//! Test fixtures for shared error codes and envelopes.

use ragpolicy_shared::{ErrorClass, ErrorCode, ErrorEnvelope};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::permission_denied(),
        ErrorCode::timeout(),
        ErrorCode::io(),
        ErrorCode::internal(),
    ]
}

/// A storage outage fixture, as a blob store would report it.
pub fn storage_unavailable_error() -> ErrorEnvelope {
    ErrorEnvelope::unexpected(ErrorCode::io(), "blob store unavailable", ErrorClass::Retriable)
}

/// An access-denied fixture.
pub fn permission_denied_error() -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::permission_denied(), "access denied")
}

/// A retriable timeout error fixture.
pub fn timeout_error() -> ErrorEnvelope {
    ErrorEnvelope::unexpected(ErrorCode::timeout(), "timeout", ErrorClass::Retriable)
}
