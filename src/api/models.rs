//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{AspectRatio, StylePreset};
use crate::storage::GenerationRow;

/// Image generation request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Text prompt; must contain at least one non-whitespace character
    #[serde(default)]
    pub prompt: String,

    /// Style preset id (defaults to "realistic")
    #[serde(default)]
    pub style: Option<String>,

    /// Aspect ratio id such as "16:9" (defaults to "1:1")
    #[serde(default)]
    pub aspect_ratio: Option<String>,

    /// Image model id (defaults to the configured model)
    #[serde(default)]
    pub model_version: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: None,
            aspect_ratio: None,
            model_version: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_version = Some(model.into());
        self
    }
}

/// A completed generation, as returned by `/generate` and listed by `/library`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    /// Store-issued id, or `temp_<millis>` when the record was not saved
    pub id: String,
    /// Public URL of the image, or an inline `data:image/png;base64,` URI
    pub image_url: String,
    pub original_prompt: String,
    pub refined_prompt: String,
    pub negative_prompt: String,
    pub style: String,
    pub aspect_ratio: String,
    pub model_version: String,
    pub user_id: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl From<GenerationRow> for GenerationRecord {
    fn from(row: GenerationRow) -> Self {
        Self {
            id: row.id,
            image_url: row.image_url,
            original_prompt: row.original_prompt,
            refined_prompt: row.refined_prompt,
            negative_prompt: row.negative_prompt,
            style: row.style,
            aspect_ratio: row.aspect_ratio,
            model_version: row.model_version,
            user_id: row.user_id,
            created_at: row.created_at,
            processing_time_ms: row.processing_time,
        }
    }
}

/// Library query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LibraryQuery {
    /// Page size (default 50, at most 100)
    pub limit: Option<usize>,
    /// Number of records to skip
    pub offset: Option<usize>,
    /// Only records with this style
    pub style: Option<String>,
    /// Only records produced by this model
    pub model_version: Option<String>,
}

/// Library page
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LibraryResponse {
    pub images: Vec<GenerationRecord>,
    pub total: usize,
    pub has_more: bool,
    /// Set when the store could not be read; the page is then empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LibraryResponse {
    pub fn unavailable(reason: &str) -> Self {
        Self {
            images: vec![],
            total: 0,
            has_more: false,
            error: Some(reason.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct StylesResponse {
    pub styles: Vec<StylePreset>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AspectRatiosResponse {
    pub aspect_ratios: Vec<AspectRatio>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ImageModelInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    pub models: Vec<ImageModelInfo>,
    pub default_model: String,
}

/// Service banner returned by `GET /generate`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
}
