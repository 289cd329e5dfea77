use std::io::Write;

use adsift_core::config::AppConfig;

#[test]
fn test_load_full_config_from_file() {
    let toml_content = r#"
[model]
provider = "anthropic"
model_id = "claude-sonnet-4-20250514"
api_key = "sk-test-key"
timeout_secs = 30

[pipeline]
reference_average_price = 35.5

[prompts.semantic_judge]
system_instruction = "You judge search terms."
user_prompt_template = "Product: {{ product_info }}\n{{ keywords_text }}"
temperature = 0.1

[prompts.expand_keywords]
user_prompt_template = "{{ product_description }} / {{ seed_keywords }}"
model = "expander-v2"
max_output_tokens = 1024
"#;

    let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
    tmp.write_all(toml_content.as_bytes()).expect("write toml");

    let config = AppConfig::load(tmp.path()).expect("load config");

    assert_eq!(config.model.provider, "anthropic");
    assert_eq!(config.model.model_id, "claude-sonnet-4-20250514");
    assert_eq!(config.model.api_key, Some("sk-test-key".to_string()));
    assert_eq!(config.model.timeout_secs, 30);
    assert_eq!(config.pipeline.reference_average_price, 35.5);

    let judge = &config.prompts.semantic_judge;
    assert_eq!(judge.system_instruction, "You judge search terms.");
    assert_eq!(judge.temperature, Some(0.1));
    assert_eq!(judge.model, None);

    let expand = &config.prompts.expand_keywords;
    assert_eq!(expand.model.as_deref(), Some("expander-v2"));
    assert_eq!(expand.max_output_tokens, Some(1024));
    assert!(expand.system_instruction.is_empty());
}

#[test]
fn test_minimal_config_uses_defaults() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(b"[model]\nprovider = \"openai\"\n").unwrap();

    let config = AppConfig::load(tmp.path()).unwrap();

    assert_eq!(config.model.model_id, "doubao-seed-1-8-251228");
    assert_eq!(config.model.timeout_secs, 120);
    assert_eq!(config.pipeline.reference_average_price, 20.0);
    assert!(config.prompts.semantic_judge.user_prompt_template.is_empty());
}

#[test]
fn test_legacy_prompt_file_is_resolved_relative_to_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("judge.json"),
        r#"{"config": {"model": "judge-model", "temperature": 0.2, "max_completion_tokens": 512},
            "sp": "system text", "up": "Product: {{ product_info }}"}"#,
    )
    .unwrap();
    let config_path = dir.path().join("adsift.toml");
    std::fs::write(
        &config_path,
        "[prompts.semantic_judge]\nfile = \"judge.json\"\n",
    )
    .unwrap();

    let config = AppConfig::load(&config_path).unwrap();
    let judge = &config.prompts.semantic_judge;

    assert_eq!(judge.system_instruction, "system text");
    assert_eq!(judge.user_prompt_template, "Product: {{ product_info }}");
    assert_eq!(judge.model.as_deref(), Some("judge-model"));
    assert_eq!(judge.temperature, Some(0.2));
    assert_eq!(judge.max_output_tokens, Some(512));
}

#[test]
fn test_missing_prompt_file_degrades_to_empty_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("adsift.toml");
    std::fs::write(
        &config_path,
        "[prompts.expand_keywords]\nfile = \"missing.json\"\n",
    )
    .unwrap();

    let config = AppConfig::load(&config_path).unwrap();

    assert!(config.prompts.expand_keywords.system_instruction.is_empty());
    assert!(config.prompts.expand_keywords.user_prompt_template.is_empty());
}

#[test]
fn test_env_var_expansion_in_api_key() {
    std::env::set_var("ADSIFT_TEST_CONFIG_KEY", "sk-from-env");
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(b"[model]\napi_key = \"${ADSIFT_TEST_CONFIG_KEY}\"\n")
        .unwrap();

    let config = AppConfig::load(tmp.path()).unwrap();

    assert_eq!(config.model.api_key.as_deref(), Some("sk-from-env"));
}

#[test]
fn test_negative_reference_price_rejected() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(b"[pipeline]\nreference_average_price = -1.0\n")
        .unwrap();

    assert!(AppConfig::load(tmp.path()).is_err());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(config.model.provider, "openai");
}
