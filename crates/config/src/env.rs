//! Environment settings consumed by configuration resolution.
//!
//! Parsing is strict: present-but-empty or unrecognised values fail instead
//! of silently falling back to defaults.

use ragpolicy_domain::OrchestrationStrategy;
use ragpolicy_shared::{ErrorCode, ErrorEnvelope, redact_if_secret};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: default orchestration strategy.
pub const ENV_ORCHESTRATION_STRATEGY: &str = "ORCHESTRATION_STRATEGY";
/// Env var: enable advanced image processing for image document types.
pub const ENV_USE_ADVANCED_IMAGE_PROCESSING: &str = "USE_ADVANCED_IMAGE_PROCESSING";
/// Env var: read and write the active configuration in blob storage.
pub const ENV_LOAD_CONFIG_FROM_BLOB_STORAGE: &str = "LOAD_CONFIG_FROM_BLOB_STORAGE";

const RECOGNISED_VARS: [&str; 3] = [
    ENV_ORCHESTRATION_STRATEGY,
    ENV_USE_ADVANCED_IMAGE_PROCESSING,
    ENV_LOAD_CONFIG_FROM_BLOB_STORAGE,
];

/// Typed settings read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigEnv {
    /// Orchestrator used by the default configuration.
    pub orchestration_strategy: OrchestrationStrategy,
    /// Adds advanced-image-processing policies for image types.
    pub use_advanced_image_processing: bool,
    /// When false the resolver never touches blob storage.
    pub load_config_from_blob_storage: bool,
}

impl Default for ConfigEnv {
    fn default() -> Self {
        Self {
            orchestration_strategy: OrchestrationStrategy::OpenaiFunction,
            use_advanced_image_processing: false,
            load_config_from_blob_storage: true,
        }
    }
}

impl ConfigEnv {
    /// Parse settings from a name/value map. Missing variables take defaults.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        let defaults = Self::default();
        Ok(Self {
            orchestration_strategy: parse_optional_orchestration(map, ENV_ORCHESTRATION_STRATEGY)?
                .unwrap_or(defaults.orchestration_strategy),
            use_advanced_image_processing: parse_optional_bool(
                map,
                ENV_USE_ADVANCED_IMAGE_PROCESSING,
            )?
            .unwrap_or(defaults.use_advanced_image_processing),
            load_config_from_blob_storage: parse_optional_bool(
                map,
                ENV_LOAD_CONFIG_FROM_BLOB_STORAGE,
            )?
            .unwrap_or(defaults.load_config_from_blob_storage),
        })
    }

    /// Parse settings from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in RECOGNISED_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }

        Self::from_map(&map)
    }
}

/// Env parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidEnum { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", redact_if_secret(var, &value))
            },
        }
    }
}

fn parse_optional_trimmed<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed))
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed(map, var)? else {
        return Ok(None);
    };

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: trimmed.to_owned(),
        }),
    }
}

fn parse_optional_orchestration(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<OrchestrationStrategy>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed(map, var)? else {
        return Ok(None);
    };

    trimmed
        .to_ascii_lowercase()
        .parse::<OrchestrationStrategy>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn missing_vars_take_defaults() -> Result<(), Box<dyn Error>> {
        let env = ConfigEnv::from_map(&BTreeMap::new())?;
        assert_eq!(env, ConfigEnv::default());
        assert!(env.load_config_from_blob_storage);
        assert!(!env.use_advanced_image_processing);
        Ok(())
    }

    #[test]
    fn values_are_trimmed_and_case_insensitive() -> Result<(), Box<dyn Error>> {
        let env = ConfigEnv::from_map(&map(&[
            (ENV_ORCHESTRATION_STRATEGY, " Semantic_Kernel "),
            (ENV_USE_ADVANCED_IMAGE_PROCESSING, "TRUE"),
            (ENV_LOAD_CONFIG_FROM_BLOB_STORAGE, "off"),
        ]))?;
        assert_eq!(
            env.orchestration_strategy,
            OrchestrationStrategy::SemanticKernel
        );
        assert!(env.use_advanced_image_processing);
        assert!(!env.load_config_from_blob_storage);
        Ok(())
    }

    #[test]
    fn empty_values_are_rejected() {
        let error = ConfigEnv::from_map(&map(&[(ENV_USE_ADVANCED_IMAGE_PROCESSING, "  ")])).err();
        assert_eq!(
            error,
            Some(EnvParseError::EmptyValue {
                var: ENV_USE_ADVANCED_IMAGE_PROCESSING
            })
        );
    }

    #[test]
    fn invalid_values_map_to_envelope_codes() -> Result<(), Box<dyn Error>> {
        let error = ConfigEnv::from_map(&map(&[(ENV_LOAD_CONFIG_FROM_BLOB_STORAGE, "maybe")]))
            .err()
            .ok_or("expected bool failure")?;
        let envelope: ErrorEnvelope = error.into();
        assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_bool"));
        assert_eq!(
            envelope.metadata.get("value").map(String::as_str),
            Some("maybe")
        );

        let error = ConfigEnv::from_map(&map(&[(ENV_ORCHESTRATION_STRATEGY, "autogen")]))
            .err()
            .ok_or("expected enum failure")?;
        let envelope: ErrorEnvelope = error.into();
        assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_enum"));
        assert_eq!(
            envelope.metadata.get("env_var").map(String::as_str),
            Some(ENV_ORCHESTRATION_STRATEGY)
        );
        Ok(())
    }
}
