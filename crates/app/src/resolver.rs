//! Resolve the active configuration, falling back to (and persisting) defaults.
//!
//! The resolver owns a single-slot `ResolverCache`. Mutating operations take
//! `&mut self`, so sharing a resolver across threads requires an external lock.

use ragpolicy_config::{
    Config, ConfigDecodeError, ConfigDocument, ConfigEnv, DefaultConfigBuilder, StoredConfig,
    decode_config_document, document_from_value, migrate, to_pretty_json,
    validate_advanced_image_processing,
};
use ragpolicy_ports::{BlobKey, BlobStorePort, JSON_CONTENT_TYPE, LogFields, LoggerPort, log_fields};
use ragpolicy_shared::{ErrorEnvelope, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Logical container holding the persisted configuration.
pub const CONFIG_CONTAINER: &str = "config";
/// Blob name of the active configuration.
pub const ACTIVE_CONFIG_BLOB: &str = "active.json";

/// How the cached configuration was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Decoded from the persisted blob.
    Loaded,
    /// Built from defaults (blob absent, unreadable, or storage disabled).
    Defaulted,
}

/// Observable resolver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// Nothing cached.
    Unloaded,
    /// Cached configuration came from storage.
    Loaded,
    /// Cached configuration came from defaults.
    Defaulted,
}

/// Single-slot cache for the resolved configuration and the default document.
#[derive(Debug, Clone, Default)]
pub struct ResolverCache {
    active: Option<(Arc<Config>, Resolution)>,
    default_document: Option<Arc<ConfigDocument>>,
}

impl ResolverCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached configuration, if any.
    #[must_use]
    pub fn get(&self) -> Option<Arc<Config>> {
        self.active.as_ref().map(|(config, _)| Arc::clone(config))
    }

    /// Store a resolved configuration, replacing any previous one.
    pub fn store(&mut self, config: Arc<Config>, resolution: Resolution) {
        self.active = Some((config, resolution));
    }

    /// Return the cached configuration or run `load` and cache its result.
    ///
    /// A failed load leaves the cache empty.
    pub fn get_or_load<F>(&mut self, load: F) -> Result<Arc<Config>>
    where
        F: FnOnce() -> Result<(Config, Resolution)>,
    {
        if let Some(config) = self.get() {
            return Ok(config);
        }
        let (config, resolution) = load()?;
        let config = Arc::new(config);
        self.store(Arc::clone(&config), resolution);
        Ok(config)
    }

    /// Cached default document, if built.
    #[must_use]
    pub fn default_document(&self) -> Option<Arc<ConfigDocument>> {
        self.default_document.clone()
    }

    /// Cache the default document.
    pub fn store_default_document(&mut self, document: Arc<ConfigDocument>) {
        self.default_document = Some(document);
    }

    /// Drop both slots.
    pub fn invalidate(&mut self) {
        self.active = None;
        self.default_document = None;
    }

    /// Current state of the active slot.
    #[must_use]
    pub fn state(&self) -> ResolverState {
        match self.active {
            None => ResolverState::Unloaded,
            Some((_, Resolution::Loaded)) => ResolverState::Loaded,
            Some((_, Resolution::Defaulted)) => ResolverState::Defaulted,
        }
    }
}

/// Configuration resolver backed by a blob store.
pub struct ConfigResolver {
    blob_store: Arc<dyn BlobStorePort>,
    env: ConfigEnv,
    logger: Option<Arc<dyn LoggerPort>>,
    cache: ResolverCache,
}

impl ConfigResolver {
    /// Resolver with an empty cache and no logger.
    #[must_use]
    pub fn new(blob_store: Arc<dyn BlobStorePort>, env: ConfigEnv) -> Self {
        Self {
            blob_store,
            env,
            logger: None,
            cache: ResolverCache::new(),
        }
    }

    /// Attach a logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn LoggerPort>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Replace the cache (e.g. one pre-seeded by the host).
    #[must_use]
    pub fn with_cache(mut self, cache: ResolverCache) -> Self {
        self.cache = cache;
        self
    }

    /// Environment settings in effect.
    #[must_use]
    pub const fn env(&self) -> &ConfigEnv {
        &self.env
    }

    /// Current cache state.
    #[must_use]
    pub fn state(&self) -> ResolverState {
        self.cache.state()
    }

    /// Key of the active configuration blob.
    pub fn active_key() -> Result<BlobKey> {
        BlobKey::new(CONFIG_CONTAINER, ACTIVE_CONFIG_BLOB)
    }

    /// The default document for the current environment, built once.
    pub fn default_document(&mut self) -> Result<Arc<ConfigDocument>> {
        if let Some(document) = self.cache.default_document() {
            return Ok(document);
        }
        let document = Arc::new(DefaultConfigBuilder::from_env(&self.env).build()?);
        self.cache.store_default_document(Arc::clone(&document));
        Ok(document)
    }

    /// Return the cached configuration, or resolve it from storage.
    ///
    /// A missing or undecodable blob is not an error: the default is served
    /// and written back. Storage errors propagate.
    pub fn get_active_or_default(&mut self) -> Result<Arc<Config>> {
        if let Some(config) = self.cache.get() {
            return Ok(config);
        }

        let defaults = self.default_document()?;
        let blob_store = Arc::clone(&self.blob_store);
        let env = self.env;
        let logger = self.logger.clone();
        self.cache
            .get_or_load(|| resolve(blob_store.as_ref(), &env, logger.as_deref(), &defaults))
    }

    /// Validate a candidate mapping and persist it as the active configuration.
    ///
    /// The candidate must satisfy the advanced-image-processing constraint and
    /// decode as a config document, so that a saved blob is always readable.
    /// Nothing is uploaded when either check fails. The cache is left untouched.
    pub fn save_as_active(&self, candidate: &Value) -> Result<()> {
        if let Err(envelope) = check_candidate(candidate) {
            if let Some(logger) = self.logger.as_deref() {
                logger.warn(
                    "config.save.rejected",
                    "Candidate config rejected",
                    Some(log_fields_error(&envelope)),
                );
            }
            return Err(envelope);
        }

        let key = Self::active_key()?;
        let body = to_pretty_json(candidate)?;
        self.blob_store
            .upload(&key, body.as_bytes(), JSON_CONTENT_TYPE)?;

        if let Some(logger) = self.logger.as_deref() {
            logger.info(
                "config.save.completed",
                "Active config saved",
                Some(log_fields_blob(&key, body.len())),
            );
        }
        Ok(())
    }

    /// Delete the persisted active configuration.
    ///
    /// The in-process cache is kept; call `clear` to drop it.
    pub fn delete(&self) -> Result<()> {
        let key = Self::active_key()?;
        self.blob_store.delete(&key)?;
        if let Some(logger) = self.logger.as_deref() {
            logger.info(
                "config.delete.completed",
                "Active config deleted",
                Some(log_fields_key(&key)),
            );
        }
        Ok(())
    }

    /// Drop the cached configuration and default document. No storage effect.
    pub fn clear(&mut self) {
        let previous = self.cache.state();
        self.cache.invalidate();
        if let Some(logger) = self.logger.as_deref() {
            logger.debug(
                "config.cache.cleared",
                "Config cache cleared",
                Some(log_fields([(
                    "previousState",
                    Value::from(state_name(previous)),
                )])),
            );
        }
    }
}

fn check_candidate(candidate: &Value) -> Result<()> {
    validate_advanced_image_processing(candidate)?;
    document_from_value(candidate)?;
    Ok(())
}

fn resolve(
    blob_store: &dyn BlobStorePort,
    env: &ConfigEnv,
    logger: Option<&dyn LoggerPort>,
    defaults: &ConfigDocument,
) -> Result<(Config, Resolution)> {
    let started_at = Instant::now();
    let advanced = env.use_advanced_image_processing;

    if !env.load_config_from_blob_storage {
        let config = Config::from_document(defaults.clone(), advanced)?;
        log_defaulted(logger, "storage_disabled", started_at);
        return Ok((config, Resolution::Defaulted));
    }

    let key = ConfigResolver::active_key()?;
    if !blob_store.exists(&key)? {
        let config = persist_default(blob_store, &key, defaults, advanced)?;
        log_defaulted(logger, "not_found", started_at);
        return Ok((config, Resolution::Defaulted));
    }

    let bytes = blob_store.download(&key)?;
    match decode_stored(&bytes, defaults, advanced) {
        Ok((config, legacy)) => {
            if let Some(logger) = logger {
                let mut fields = log_fields_blob(&key, bytes.len());
                fields.insert("legacy".into(), Value::Bool(legacy));
                fields.insert("durationMs".into(), Value::from(duration_ms(started_at)));
                logger.info("config.resolve.loaded", "Active config loaded", Some(fields));
            }
            Ok((config, Resolution::Loaded))
        },
        Err(error) => {
            if let Some(logger) = logger {
                logger.warn(
                    "config.resolve.decode_failed",
                    "Stored config could not be decoded; using defaults",
                    Some(log_fields_error(&ErrorEnvelope::from(error))),
                );
            }
            let config = persist_default(blob_store, &key, defaults, advanced)?;
            log_defaulted(logger, "decode_failed", started_at);
            Ok((config, Resolution::Defaulted))
        },
    }
}

fn decode_stored(
    bytes: &[u8],
    defaults: &ConfigDocument,
    advanced: bool,
) -> std::result::Result<(Config, bool), ConfigDecodeError> {
    let stored = StoredConfig::classify(decode_config_document(bytes)?);
    let legacy = stored.is_legacy();
    let config = Config::from_document(migrate(stored, defaults), advanced)?;
    Ok((config, legacy))
}

fn persist_default(
    blob_store: &dyn BlobStorePort,
    key: &BlobKey,
    defaults: &ConfigDocument,
    advanced: bool,
) -> Result<Config> {
    let config = Config::from_document(defaults.clone(), advanced)?;
    let body = to_pretty_json(defaults)?;
    blob_store.upload(key, body.as_bytes(), JSON_CONTENT_TYPE)?;
    Ok(config)
}

fn log_defaulted(logger: Option<&dyn LoggerPort>, reason: &str, started_at: Instant) {
    if let Some(logger) = logger {
        logger.info(
            "config.resolve.defaulted",
            "Default config served",
            Some(log_fields([
                ("reason", Value::from(reason)),
                ("durationMs", Value::from(duration_ms(started_at))),
            ])),
        );
    }
}

const fn state_name(state: ResolverState) -> &'static str {
    match state {
        ResolverState::Unloaded => "unloaded",
        ResolverState::Loaded => "loaded",
        ResolverState::Defaulted => "defaulted",
    }
}

fn duration_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn log_fields_key(key: &BlobKey) -> LogFields {
    log_fields([
        ("container", Value::from(key.container())),
        ("blob", Value::from(key.name())),
    ])
}

fn log_fields_blob(key: &BlobKey, bytes: usize) -> LogFields {
    let mut fields = log_fields_key(key);
    fields.insert("bytes".into(), Value::from(bytes));
    fields
}

fn log_fields_error(error: &ErrorEnvelope) -> LogFields {
    log_fields([
        ("code", Value::from(error.code.to_string())),
        ("error", Value::from(error.message.as_str())),
    ])
}
