//! Style presets and aspect ratios
//!
//! The tables are plain data (`config/presets.yaml`, embedded at build time)
//! and are validated once when the catalog is loaded. Lookups after that
//! point are total: unknown ids resolve to the default entry.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use utoipa::ToSchema;

/// Style used when a request names none or an unknown one
pub const DEFAULT_STYLE: &str = "realistic";

/// Aspect ratio used when a request names none or an unknown one
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// Allowed deviation between `width / height` and the encoded `W:H` ratio
pub const RATIO_TOLERANCE: f64 = 0.1;

const BUILTIN_PRESETS: &str = include_str!("../../config/presets.yaml");

/// A named style with its positive and negative prompt fragments
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub negative_prompt: String,
}

/// Output dimensions for a `W:H` ratio
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
pub struct AspectRatio {
    pub id: String,
    pub name: String,
    pub value: String,
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Parse `value` ("16:9") into its two terms
    pub fn terms(&self) -> Option<(u32, u32)> {
        let (w, h) = self.value.split_once(':')?;
        let w: u32 = w.trim().parse().ok()?;
        let h: u32 = h.trim().parse().ok()?;
        if w == 0 || h == 0 {
            return None;
        }
        Some((w, h))
    }

    /// Whether the pixel dimensions match the encoded ratio
    pub fn is_consistent(&self) -> bool {
        match self.terms() {
            Some((w, h)) if self.width > 0 && self.height > 0 => {
                let actual = self.width as f64 / self.height as f64;
                let expected = w as f64 / h as f64;
                (actual - expected).abs() < RATIO_TOLERANCE
            }
            _ => false,
        }
    }
}

/// Validated preset tables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Catalog {
    styles: Vec<StylePreset>,
    aspect_ratios: Vec<AspectRatio>,
}

impl Catalog {
    /// Load the tables shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_PRESETS)
    }

    /// Load tables from a YAML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            catalog_error(format!(
                "Failed to read presets file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate tables from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(content)
            .map_err(|e| catalog_error(format!("Failed to parse presets: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the structural invariants of both tables
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for style in &self.styles {
            if !ids.insert(style.id.as_str()) {
                return Err(catalog_error(format!("Duplicate style id '{}'", style.id)));
            }
            if style.prompt.trim().is_empty() || style.negative_prompt.trim().is_empty() {
                return Err(catalog_error(format!(
                    "Style '{}' needs both a prompt and a negative prompt",
                    style.id
                )));
            }
            if style.prompt == style.negative_prompt {
                return Err(catalog_error(format!(
                    "Style '{}' has identical prompt and negative prompt",
                    style.id
                )));
            }
        }
        if !ids.contains(DEFAULT_STYLE) {
            return Err(catalog_error(format!(
                "Default style '{}' is missing",
                DEFAULT_STYLE
            )));
        }

        let mut ids = HashSet::new();
        for ratio in &self.aspect_ratios {
            if !ids.insert(ratio.id.as_str()) {
                return Err(catalog_error(format!(
                    "Duplicate aspect ratio id '{}'",
                    ratio.id
                )));
            }
            if !ratio.is_consistent() {
                return Err(catalog_error(format!(
                    "Aspect ratio '{}' ({}x{}) does not match '{}'",
                    ratio.id, ratio.width, ratio.height, ratio.value
                )));
            }
        }
        if !ids.contains(DEFAULT_ASPECT_RATIO) {
            return Err(catalog_error(format!(
                "Default aspect ratio '{}' is missing",
                DEFAULT_ASPECT_RATIO
            )));
        }

        Ok(())
    }

    pub fn styles(&self) -> &[StylePreset] {
        &self.styles
    }

    pub fn aspect_ratios(&self) -> &[AspectRatio] {
        &self.aspect_ratios
    }

    /// Look up a style, falling back to the default style
    pub fn style(&self, id: &str) -> &StylePreset {
        self.styles
            .iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| self.default_style())
    }

    /// Look up an aspect ratio, falling back to the square entry
    pub fn aspect_ratio(&self, id: &str) -> &AspectRatio {
        self.aspect_ratios
            .iter()
            .find(|r| r.id == id)
            .unwrap_or_else(|| self.default_aspect_ratio())
    }

    fn default_style(&self) -> &StylePreset {
        // validate() guarantees the default entry exists
        self.styles
            .iter()
            .find(|s| s.id == DEFAULT_STYLE)
            .unwrap_or(&self.styles[0])
    }

    fn default_aspect_ratio(&self) -> &AspectRatio {
        self.aspect_ratios
            .iter()
            .find(|r| r.id == DEFAULT_ASPECT_RATIO)
            .unwrap_or(&self.aspect_ratios[0])
    }
}

fn catalog_error(message: String) -> AppError {
    AppError::Config(config::ConfigError::Message(message))
}
