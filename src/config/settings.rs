//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub refinement: RefinementConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Optional YAML file replacing the built-in style and aspect-ratio tables
    #[serde(default)]
    pub presets_path: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Fixed-window rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    60 * 60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

/// Credentials for an outbound API, either inline or read from the environment
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ApiAuth {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub token_env: Option<String>,
}

impl ApiAuth {
    fn with_env(var: &str) -> Self {
        Self {
            api_key: None,
            token_env: Some(var.to_string()),
        }
    }

    /// Resolve the token, preferring the inline key over the environment
    pub fn resolve(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| {
                self.token_env
                    .as_ref()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|k| !k.is_empty())
            })
    }
}

/// Image model offered to clients
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ImageModelConfig {
    pub id: String,
    pub name: String,
}

/// Inference API configuration (Hugging Face Inference API)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_url")]
    pub base_url: String,
    #[serde(default = "default_inference_auth")]
    pub auth: ApiAuth,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_models")]
    pub image_models: Vec<ImageModelConfig>,
    /// Model used when a request does not name one; first image model otherwise
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default = "default_image_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f32,
    #[serde(default = "default_inference_steps")]
    pub num_inference_steps: u32,
}

fn default_inference_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_inference_auth() -> ApiAuth {
    ApiAuth::with_env("HUGGING_FACE_API_KEY")
}

fn default_text_model() -> String {
    "microsoft/DialoGPT-medium".to_string()
}

fn default_image_models() -> Vec<ImageModelConfig> {
    vec![
        ImageModelConfig {
            id: "tencent/HunyuanImage-3.0".to_string(),
            name: "HunyuanImage 3.0".to_string(),
        },
        ImageModelConfig {
            id: "black-forest-labs/FLUX.1-dev".to_string(),
            name: "FLUX.1-dev".to_string(),
        },
    ]
}

fn default_image_timeout() -> u64 {
    120_000
}

fn default_guidance_scale() -> f32 {
    7.0
}

fn default_inference_steps() -> u32 {
    30
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_url(),
            auth: default_inference_auth(),
            text_model: default_text_model(),
            image_models: default_image_models(),
            default_model: None,
            timeout_ms: default_image_timeout(),
            guidance_scale: default_guidance_scale(),
            num_inference_steps: default_inference_steps(),
        }
    }
}

impl InferenceConfig {
    /// Model id used when the request leaves `modelVersion` empty
    pub fn default_model_id(&self) -> Option<&str> {
        self.default_model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.image_models.first().map(|m| m.id.as_str()))
    }
}

/// Prompt refinement configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefinementConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_refine_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_refine_timeout() -> u64 {
    15_000
}

fn default_max_length() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: default_refine_timeout(),
            max_length: default_max_length(),
            temperature: default_temperature(),
        }
    }
}

/// Which persistence backend to use
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Supabase,
    Local,
    Disabled,
}

impl std::fmt::Display for StorageBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendKind::Supabase => write!(f, "supabase"),
            StorageBackendKind::Local => write!(f, "local"),
            StorageBackendKind::Disabled => write!(f, "disabled"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackendKind,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub local: LocalStorageConfig,
}

/// Hosted Supabase project (Storage + PostgREST)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_supabase_url_env")]
    pub url_env: String,
    #[serde(default = "default_supabase_auth")]
    pub auth: ApiAuth,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_storage_timeout")]
    pub timeout_ms: u64,
}

fn default_supabase_url_env() -> String {
    "SUPABASE_URL".to_string()
}

fn default_supabase_auth() -> ApiAuth {
    ApiAuth::with_env("SUPABASE_ANON_KEY")
}

fn default_bucket() -> String {
    "generated-images".to_string()
}

fn default_table() -> String {
    "generations".to_string()
}

fn default_storage_timeout() -> u64 {
    30_000
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            url_env: default_supabase_url_env(),
            auth: default_supabase_auth(),
            bucket: default_bucket(),
            table: default_table(),
            timeout_ms: default_storage_timeout(),
        }
    }
}

impl SupabaseConfig {
    /// Project URL from the config file or the environment
    pub fn resolve_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| std::env::var(&self.url_env).ok())
            .filter(|u| !u.trim().is_empty())
    }
}

/// Local disk storage used for development
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalStorageConfig {
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

fn default_storage_path() -> String {
    "./generated_images".to_string()
}

fn default_url_prefix() -> String {
    "http://localhost:3000/images".to_string()
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            url_prefix: default_url_prefix(),
        }
    }
}

/// Public library paging
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    #[serde(default = "default_page_size")]
    pub default_limit: usize,
    #[serde(default = "default_max_page_size")]
    pub max_limit: usize,
}

fn default_page_size() -> usize {
    50
}

fn default_max_page_size() -> usize {
    100
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_size(),
            max_limit: default_max_page_size(),
        }
    }
}

/// Client-side generation history
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_key")]
    pub storage_key: String,
    #[serde(default = "default_history_items")]
    pub max_items: usize,
    #[serde(default = "default_history_expiry")]
    pub expiry_days: i64,
}

fn default_history_key() -> String {
    "pixilator_history".to_string()
}

fn default_history_items() -> usize {
    10
}

fn default_history_expiry() -> i64 {
    30
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_key: default_history_key(),
            max_items: default_history_items(),
            expiry_days: default_history_expiry(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/pixilator.yaml")
    }

    /// Load settings from a specific YAML or TOML file, then apply `PIXILATOR__*` overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let format = if path.extension().map_or(false, |ext| ext == "toml") {
            FileFormat::Toml
        } else {
            FileFormat::Yaml
        };

        let mut config_builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("rate_limit.enabled", true)?
            .set_default("rate_limit.max_requests", default_max_requests())?
            .set_default("rate_limit.window_secs", default_window_secs())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?;

        if path.exists() {
            config_builder = config_builder.add_source(File::from(path).format(format));
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix("PIXILATOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = config_builder.build()?;
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(config_error("Server port cannot be 0"));
        }

        if self.rate_limit.enabled {
            if self.rate_limit.max_requests == 0 {
                return Err(config_error("rate_limit.max_requests must be at least 1"));
            }
            if self.rate_limit.window_secs == 0 {
                return Err(config_error("rate_limit.window_secs must be at least 1"));
            }
        }

        if self.inference.base_url.trim().is_empty() {
            return Err(config_error("inference.base_url cannot be empty"));
        }

        if self.inference.default_model_id().is_none() {
            return Err(config_error(
                "inference needs a default_model or at least one image model",
            ));
        }

        if self.library.default_limit == 0 || self.library.default_limit > self.library.max_limit {
            return Err(config_error(
                "library.default_limit must be between 1 and library.max_limit",
            ));
        }

        if self.history.max_items == 0 {
            return Err(config_error("history.max_items must be at least 1"));
        }

        Ok(())
    }
}

fn config_error(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}
