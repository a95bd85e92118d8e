//! Best-effort prompt refinement

use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::{TextGenerationParameters, TextGenerationRequest, TextGenerator};
use crate::config::RefinementConfig;

/// Instruction placed in front of the user's prompt
pub const REFINEMENT_INSTRUCTION: &str =
    "Enhance this image prompt to be more detailed and descriptive:";

/// Rewrites prompts through a text model. Never fails: any problem yields the
/// original prompt.
pub struct PromptRefiner {
    generator: Option<Arc<dyn TextGenerator>>,
    max_length: u32,
    temperature: f32,
}

impl PromptRefiner {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &RefinementConfig) -> Self {
        Self {
            generator: config.enabled.then_some(generator),
            max_length: config.max_length,
            temperature: config.temperature,
        }
    }

    /// A refiner that passes prompts through untouched
    pub fn disabled() -> Self {
        let defaults = RefinementConfig::default();
        Self {
            generator: None,
            max_length: defaults.max_length,
            temperature: defaults.temperature,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Outbound payload for a raw prompt
    pub fn build_request(&self, raw_prompt: &str) -> TextGenerationRequest {
        TextGenerationRequest {
            inputs: format!("{} {}", REFINEMENT_INSTRUCTION, raw_prompt),
            parameters: TextGenerationParameters {
                max_length: self.max_length,
                temperature: self.temperature,
            },
        }
    }

    /// Refined prompt, or `raw_prompt` when refinement is off or fails
    pub async fn refine(&self, raw_prompt: &str) -> String {
        let Some(generator) = &self.generator else {
            return raw_prompt.to_string();
        };

        let request = self.build_request(raw_prompt);
        match generator.generate_text(&request).await {
            Ok(sequences) => {
                let refined = sequences
                    .into_iter()
                    .next()
                    .and_then(|s| s.generated_text)
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty());

                match refined {
                    Some(text) => {
                        debug!(backend = %generator.name(), "Prompt refined");
                        text
                    }
                    None => {
                        warn!(backend = %generator.name(), "Refinement returned no text, using original prompt");
                        raw_prompt.to_string()
                    }
                }
            }
            Err(e) => {
                warn!(backend = %generator.name(), error = %e, "Prompt enhancement failed, using original prompt");
                raw_prompt.to_string()
            }
        }
    }
}
