//! Unit tests for configuration loading

use pixilator_gateway::config::{Settings, StorageBackendKind};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_missing_file_uses_defaults() {
    let settings = Settings::load_from_path("does/not/exist.yaml").unwrap();

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.rate_limit.max_requests, 10);
    assert_eq!(settings.rate_limit.window_secs, 3600);
    assert_eq!(settings.storage.backend, StorageBackendKind::Supabase);
    assert_eq!(settings.library.default_limit, 50);
    assert_eq!(settings.library.max_limit, 100);
}

#[test]
fn test_load_yaml_file() {
    let file = write_config(
        r#"
server:
  host: "127.0.0.1"
  port: 8080
rate_limit:
  max_requests: 3
  window_secs: 60
inference:
  image_models:
    - id: "model-x"
      name: "Model X"
  default_model: "model-x"
storage:
  backend: local
  local:
    base_path: "/tmp/pixilator-images"
    url_prefix: "http://localhost:8080/images"
logging:
  level: "debug"
  format: "pretty"
"#,
    );

    let settings = Settings::load_from_path(file.path()).unwrap();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.rate_limit.max_requests, 3);
    assert_eq!(settings.rate_limit.window_secs, 60);
    assert_eq!(settings.inference.default_model_id(), Some("model-x"));
    assert_eq!(settings.storage.backend, StorageBackendKind::Local);
    assert_eq!(settings.storage.local.base_path, "/tmp/pixilator-images");
    assert_eq!(settings.logging.format, "pretty");
    // Untouched sections keep their defaults
    assert_eq!(settings.refinement.max_length, 150);
    assert_eq!(settings.history.max_items, 10);
}

#[test]
fn test_invalid_file_is_rejected() {
    let file = write_config(
        r#"
server:
  port: 0
"#,
    );

    assert!(Settings::load_from_path(file.path()).is_err());
}

#[test]
fn test_validation_rules() {
    let mut settings = Settings::default();
    assert!(settings.validate().is_ok());

    settings.rate_limit.max_requests = 0;
    assert!(settings.validate().is_err());

    // A disabled limiter does not care about its bounds
    settings.rate_limit.enabled = false;
    assert!(settings.validate().is_ok());

    let mut settings = Settings::default();
    settings.library.default_limit = 500;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.inference.image_models.clear();
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.history.max_items = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn test_shipped_config_file_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/pixilator.yaml");
    let settings = Settings::load_from_path(path).unwrap();
    assert!(!settings.inference.image_models.is_empty());
}
