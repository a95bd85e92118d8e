//! The generation pipeline
//!
//! admission -> validation -> refine -> negative prompt -> synthesize ->
//! persist -> assemble. Only admission, validation and synthesis can end a
//! request early.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::api::models::{GenerationRecord, GenerationRequest};
use crate::config::{DEFAULT_ASPECT_RATIO, DEFAULT_STYLE};
use crate::error::{AppError, Result};
use crate::gateway::negative_prompt::NegativePromptResolver;
use crate::gateway::persistence::{GenerationMetadata, PersistenceGateway};
use crate::gateway::refiner::PromptRefiner;
use crate::gateway::synthesizer::ImageSynthesizer;
use crate::middleware::FixedWindowRateLimiter;
use crate::storage::PUBLIC_USER_ID;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const EMPTY_PROMPT_MESSAGE: &str = "Prompt is required";

pub struct GenerationOrchestrator {
    rate_limiter: Arc<FixedWindowRateLimiter>,
    refiner: PromptRefiner,
    resolver: NegativePromptResolver,
    synthesizer: ImageSynthesizer,
    persistence: PersistenceGateway,
    default_model: String,
}

impl GenerationOrchestrator {
    pub fn new(
        rate_limiter: Arc<FixedWindowRateLimiter>,
        refiner: PromptRefiner,
        resolver: NegativePromptResolver,
        synthesizer: ImageSynthesizer,
        persistence: PersistenceGateway,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            rate_limiter,
            refiner,
            resolver,
            synthesizer,
            persistence,
            default_model: default_model.into(),
        }
    }

    pub fn rate_limiter(&self) -> &FixedWindowRateLimiter {
        &self.rate_limiter
    }

    pub fn persistence(&self) -> &PersistenceGateway {
        &self.persistence
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Run one generation for `client_key`
    pub async fn handle(&self, client_key: &str, request: GenerationRequest) -> Result<GenerationRecord> {
        let started = Instant::now();

        if !self.rate_limiter.admit(client_key) {
            warn!(client = %client_key, "Generation rejected by rate limiter");
            return Err(AppError::RateLimited(RATE_LIMIT_MESSAGE.to_string()));
        }

        if request.prompt.trim().is_empty() {
            debug!(client = %client_key, "Generation rejected: empty prompt");
            return Err(AppError::Validation(EMPTY_PROMPT_MESSAGE.to_string()));
        }

        let style = non_empty(request.style).unwrap_or_else(|| DEFAULT_STYLE.to_string());
        let aspect_ratio =
            non_empty(request.aspect_ratio).unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string());
        let model_version = non_empty(request.model_version).unwrap_or_else(|| self.default_model.clone());
        let original_prompt = request.prompt;

        info!(
            client = %client_key,
            style = %style,
            aspect_ratio = %aspect_ratio,
            model = %model_version,
            "Received image generation request"
        );

        let refined_prompt = self.refiner.refine(&original_prompt).await;
        let negative_prompt = self.resolver.resolve(&style).to_string();

        let image = self
            .synthesizer
            .synthesize(&refined_prompt, &negative_prompt, &aspect_ratio, &model_version)
            .await?;

        let metadata = GenerationMetadata {
            original_prompt,
            refined_prompt,
            negative_prompt,
            style,
            aspect_ratio,
            model_version,
            processing_time_ms: elapsed_ms(started),
        };
        let outcome = self.persistence.persist(&image, &metadata).await;

        let id = outcome
            .id
            .unwrap_or_else(|| format!("temp_{}", Utc::now().timestamp_millis()));
        let processing_time_ms = elapsed_ms(started);

        info!(id = %id, processing_time_ms, "Image generation completed");

        Ok(GenerationRecord {
            id,
            image_url: outcome.public_url,
            original_prompt: metadata.original_prompt,
            refined_prompt: metadata.refined_prompt,
            negative_prompt: metadata.negative_prompt,
            style: metadata.style,
            aspect_ratio: metadata.aspect_ratio,
            model_version: metadata.model_version,
            user_id: PUBLIC_USER_ID.to_string(),
            created_at: outcome.created_at.unwrap_or_else(Utc::now),
            processing_time_ms: Some(processing_time_ms),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
