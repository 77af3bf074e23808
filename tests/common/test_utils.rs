use emotion_service::{
    Result,
    config::{
        ClassifierBackend, ClassifierConfig, Config, HttpClassifierConfig, LogsConfig,
        ServerConfig,
    },
};
use tempfile::TempDir;
use tokio::fs;

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        classifier: ClassifierConfig {
            backend: ClassifierBackend::Http,
            http: Some(HttpClassifierConfig {
                base_url: "http://localhost:9000/predict".to_string(),
                api_key: None,
                timeout_secs: 5,
            }),
            onnx: None,
        },
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  logs:
    level: "debug"

classifier:
  backend: "http"
  http:
    base_url: "https://api-inference.huggingface.co/models/nateraw/bert-base-uncased-emotion"
    api_key: "test-api-key"
"#;

/// Sample configuration with the ONNX backend
pub const SAMPLE_CONFIG_WITH_ONNX: &str = r#"
classifier:
  backend: "onnx"
  onnx:
    model_path: "models/emotion/model.onnx"
    tokenizer_path: "models/emotion/tokenizer.json"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"

classifier:
  backend: "telepathy"
"#;
