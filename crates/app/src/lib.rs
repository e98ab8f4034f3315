//! # ragpolicy-app
//!
//! Configuration resolver use case.
//! This crate depends on `config`, `ports`, `domain`, and `shared`.

pub mod resolver;

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use resolver::{
    ACTIVE_CONFIG_BLOB, CONFIG_CONTAINER, ConfigResolver, Resolution, ResolverCache, ResolverState,
};
