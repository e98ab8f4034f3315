//! # ragpolicy-testkit
//!
//! Test helpers and in-memory adapters.
//! This crate depends on `ports` and `shared`. JSON fixtures live under
//! `fixtures/` next to this manifest.

pub mod errors;
pub mod in_memory;

/// Returns the testkit crate version.
#[must_use]
pub const fn testkit_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Absolute path of a file under `crates/testkit/fixtures`.
#[must_use]
pub fn fixture_path(relative: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(relative)
}

/// Read a fixture file as bytes.
pub fn read_fixture(relative: &str) -> std::io::Result<Vec<u8>> {
    std::fs::read(fixture_path(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragpolicy_ports::ports_crate_version;
    use ragpolicy_shared::shared_crate_version;

    #[test]
    fn testkit_crate_compiles() {
        let version = testkit_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn testkit_can_use_ports_and_shared() {
        assert!(!ports_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }

    #[test]
    fn error_fixtures_are_available() {
        let codes = errors::common_error_codes();
        assert!(!codes.is_empty());
    }

    #[test]
    fn config_fixtures_are_readable() {
        assert!(read_fixture("config/active.current.json").is_ok());
    }
}
