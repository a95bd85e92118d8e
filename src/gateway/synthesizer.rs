//! Image synthesis through the inference API

use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{
    ImageGenerationParameters, ImageGenerationRequest, ImageGenerator, InferenceOptions,
};
use crate::config::{Catalog, InferenceConfig};
use crate::error::{AppError, Result};
use crate::response::data_uri;

/// Produces the image for a refined prompt. Unlike refinement, failures here
/// abort the request.
pub struct ImageSynthesizer {
    generator: Arc<dyn ImageGenerator>,
    catalog: Arc<Catalog>,
    guidance_scale: f32,
    num_inference_steps: u32,
}

impl ImageSynthesizer {
    pub fn new(generator: Arc<dyn ImageGenerator>, catalog: Arc<Catalog>, config: &InferenceConfig) -> Self {
        Self {
            generator,
            catalog,
            guidance_scale: config.guidance_scale,
            num_inference_steps: config.num_inference_steps,
        }
    }

    /// Outbound payload; unknown ratios use the square dimensions
    pub fn build_request(&self, prompt: &str, negative_prompt: &str, aspect_ratio: &str) -> ImageGenerationRequest {
        let ratio = self.catalog.aspect_ratio(aspect_ratio);
        ImageGenerationRequest {
            inputs: prompt.to_string(),
            parameters: ImageGenerationParameters {
                negative_prompt: negative_prompt.to_string(),
                width: ratio.width,
                height: ratio.height,
                guidance_scale: self.guidance_scale,
                num_inference_steps: self.num_inference_steps,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        }
    }

    /// Generate an image and return it as a PNG data URI
    pub async fn synthesize(
        &self,
        prompt: &str,
        negative_prompt: &str,
        aspect_ratio: &str,
        model: &str,
    ) -> Result<String> {
        let request = self.build_request(prompt, negative_prompt, aspect_ratio);

        let bytes = self
            .generator
            .generate_image(model, &request)
            .await
            .map_err(|e| {
                warn!(backend = %self.generator.name(), model = %model, error = %e, "Image synthesis failed");
                match e {
                    AppError::Synthesis(msg) => AppError::Synthesis(msg),
                    other => AppError::Synthesis(other.to_string()),
                }
            })?;

        info!(
            model = %model,
            width = request.parameters.width,
            height = request.parameters.height,
            size = bytes.len(),
            "Image synthesized"
        );

        Ok(data_uri::encode_png(&bytes))
    }
}
