//! Seams for the outbound inference calls

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Text generation request in the Hugging Face Inference API shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextGenerationRequest {
    pub inputs: String,
    pub parameters: TextGenerationParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextGenerationParameters {
    pub max_length: u32,
    pub temperature: f32,
}

/// One generated sequence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedText {
    #[serde(default)]
    pub generated_text: Option<String>,
}

/// Text-to-image request in the Hugging Face Inference API shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageGenerationRequest {
    pub inputs: String,
    pub parameters: ImageGenerationParameters,
    pub options: InferenceOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageGenerationParameters {
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub guidance_scale: f32,
    pub num_inference_steps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Block until a cold model is loaded instead of failing fast
    pub wait_for_model: bool,
}

/// Backend producing text from a prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str;

    /// Run a single text generation call
    async fn generate_text(&self, request: &TextGenerationRequest) -> Result<Vec<GeneratedText>>;
}

/// Backend producing encoded image bytes from a prompt
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str;

    /// Run a single image generation call against `model`
    async fn generate_image(&self, model: &str, request: &ImageGenerationRequest) -> Result<Vec<u8>>;
}
