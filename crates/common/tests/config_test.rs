use std::fs;
use tempfile::TempDir;
use workmatch_common::config::SystemConfig;

#[test]
fn test_config_load_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("workmatch.toml");

    let config_content = r#"
[storage]
qdrant_url = "http://localhost:6333"
qdrant_api_key = "test-key"

[embedding]
model = "all-minilm-l6-v2"
dimension = 384

[estimator]
api_key = "gemini-test-key"
model = "gemini-2.0-flash-exp"

[matching]
result_limit = 5
upsert_chunk_size = 25
"#;

    fs::write(&config_path, config_content).unwrap();

    let config = SystemConfig::from_file(config_path.to_str().unwrap()).unwrap();

    assert_eq!(config.storage.qdrant_url, "http://localhost:6333");
    assert_eq!(config.storage.qdrant_api_key.as_deref(), Some("test-key"));
    assert_eq!(config.embedding.dimension, 384);
    assert_eq!(config.matching.result_limit, 5);
    assert_eq!(config.matching.upsert_chunk_size, 25);
}

#[test]
fn test_config_defaults_applied() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("minimal.toml");

    let config_content = r#"
[storage]
qdrant_url = "http://localhost:6333"

[estimator]
api_key = "gemini-test-key"
"#;

    fs::write(&config_path, config_content).unwrap();

    let config = SystemConfig::from_file(config_path.to_str().unwrap()).unwrap();

    assert_eq!(config.embedding.model, "all-minilm-l6-v2");
    assert_eq!(config.embedding.dimension, 384);
    assert_eq!(config.matching.result_limit, 10);
    assert_eq!(config.matching.upsert_chunk_size, 50);
    assert_eq!(config.estimator.max_retries, 1);
}

#[test]
fn test_config_missing_qdrant_url_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");

    let config_content = r#"
[storage]
qdrant_url = ""

[estimator]
api_key = "gemini-test-key"
"#;

    fs::write(&config_path, config_content).unwrap();

    let result = SystemConfig::from_file(config_path.to_str().unwrap());
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("qdrant_url"));
}

#[test]
fn test_config_missing_estimator_key_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nokey.toml");

    let config_content = r#"
[storage]
qdrant_url = "http://localhost:6333"

[estimator]
api_key = ""
"#;

    fs::write(&config_path, config_content).unwrap();

    let result = SystemConfig::from_file(config_path.to_str().unwrap());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("api_key"));
}

#[test]
fn test_config_unreadable_file() {
    let result = SystemConfig::from_file("/nonexistent/workmatch.toml");
    assert!(result.is_err());
}
