//! Integration tests for decoding, migrating, and validating stored config fixtures.

use ragpolicy_config::{
    Config, ConfigDecodeError, ConfigValidationError, DefaultConfigBuilder, StoredConfig,
    decode_config_document, migrate, prompts, to_pretty_json, validate_advanced_image_processing,
};
use ragpolicy_domain::{
    AssistantType, ChunkingStrategy, ConversationalFlow, LoadingStrategy, OrchestrationStrategy,
};
use ragpolicy_shared::{ErrorCode, ErrorEnvelope};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn read_fixture(relative: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let path = workspace_root()
        .join("crates")
        .join("testkit")
        .join("fixtures")
        .join(relative);
    Ok(fs::read(path)?)
}

fn resolve(bytes: &[u8], advanced: bool) -> Result<Config, Box<dyn Error>> {
    let defaults = DefaultConfigBuilder::default()
        .use_advanced_image_processing(advanced)
        .build()?;
    let stored = StoredConfig::classify(decode_config_document(bytes)?);
    Ok(Config::from_document(migrate(stored, &defaults), advanced)?)
}

#[test]
fn current_fixture_fills_omitted_fields_from_defaults() -> Result<(), Box<dyn Error>> {
    let bytes = read_fixture("config/active.current.json")?;
    let stored = StoredConfig::classify(decode_config_document(&bytes)?);
    assert!(!stored.is_legacy());

    let config = resolve(&bytes, false)?;
    assert_eq!(config.prompts.ai_assistant_type, AssistantType::Default);
    assert_eq!(config.prompts.conversational_flow, ConversationalFlow::Custom);
    assert!(config.enable_chat_history);
    assert_eq!(config.integrated_vectorization_config, None);
    assert!(!config.logging.log_user_interactions);
    assert_eq!(config.orchestrator.strategy, OrchestrationStrategy::Langchain);
    assert_eq!(config.document_processors().len(), 4);
    Ok(())
}

#[test]
fn current_fixture_dispatch_uses_last_matching_entry() -> Result<(), Box<dyn Error>> {
    let config = resolve(&read_fixture("config/active.current.json")?, false)?;

    let txt = config.document_processor("txt")?;
    assert_eq!(txt.chunking.strategy, ChunkingStrategy::FixedSizeOverlap);
    assert_eq!(txt.chunking.size, 1000);
    assert_eq!(txt.loading.strategy, LoadingStrategy::Read);

    let png = config.document_processor("png")?;
    assert!(png.use_advanced_image_processing);

    let types: Vec<String> = config
        .available_document_types()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(types, vec!["pdf", "txt"]);
    Ok(())
}

#[test]
fn modified_legacy_fixture_keeps_custom_prompt() -> Result<(), Box<dyn Error>> {
    let bytes = read_fixture("config/active.legacy-modified.json")?;
    assert!(StoredConfig::classify(decode_config_document(&bytes)?).is_legacy());

    let config = resolve(&bytes, false)?;
    assert_eq!(
        config.prompts.answering_user_prompt,
        "Answer in one sentence using {sources} for {question}."
    );
    assert_eq!(
        config.prompts.answering_system_prompt,
        prompts::ANSWERING_SYSTEM_PROMPT
    );
    assert!(!config.prompts.use_on_your_data_format);
    assert!(config.prompts.enable_post_answering_prompt);
    assert_eq!(config.example.user_question, prompts::EXAMPLE_USER_QUESTION);
    assert_eq!(
        config.orchestrator.strategy,
        OrchestrationStrategy::SemanticKernel
    );
    Ok(())
}

#[test]
fn unmodified_legacy_prompt_adopts_new_defaults() -> Result<(), Box<dyn Error>> {
    let stored = serde_json::json!({
        "prompts": {"answering_prompt": prompts::LEGACY_ANSWERING_PROMPT}
    });
    let config = resolve(stored.to_string().as_bytes(), false)?;
    assert_eq!(
        config.prompts.answering_user_prompt,
        prompts::ANSWERING_USER_PROMPT
    );
    assert!(config.prompts.use_on_your_data_format);
    Ok(())
}

#[test]
fn invalid_candidate_fixture_is_rejected() -> Result<(), Box<dyn Error>> {
    let candidate: serde_json::Value =
        serde_json::from_slice(&read_fixture("config/candidate.invalid-advanced.json")?)?;
    let error = validate_advanced_image_processing(&candidate)
        .err()
        .ok_or("expected validation error")?;
    assert_eq!(
        error,
        ConfigValidationError::AdvancedImageProcessingUnsupported {
            document_type: "txt".to_string()
        }
    );
    Ok(())
}

#[test]
fn persisted_default_document_uses_two_space_indent() -> Result<(), Box<dyn Error>> {
    let defaults = DefaultConfigBuilder::default().build()?;
    let json = to_pretty_json(&defaults)?;
    assert!(json.starts_with("{\n  \""));
    assert!(!json.ends_with('\n'));
    assert_eq!(decode_config_document(json.as_bytes())?, defaults);
    Ok(())
}

#[test]
fn corrupt_blob_maps_to_invalid_persisted_config() {
    let error = decode_config_document(b"{\"prompts\": ").err();
    assert!(matches!(error, Some(ConfigDecodeError::InvalidJson { .. })));

    let envelope: Option<ErrorEnvelope> = error.map(Into::into);
    assert_eq!(
        envelope.map(|envelope| envelope.code),
        Some(ErrorCode::new("config", "invalid_persisted_config"))
    );
}
