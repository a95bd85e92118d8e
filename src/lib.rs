//! Pixilator Gateway
//!
//! Text-to-image generation over the Hugging Face Inference API, with
//! best-effort prompt refinement, per-style negative prompts, per-client
//! admission control and a public library of past generations.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod middleware;
pub mod response;
pub mod storage;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::{HuggingFaceImageBackend, HuggingFaceTextBackend};
use config::{Catalog, Settings};
use gateway::{
    GenerationOrchestrator, ImageSynthesizer, NegativePromptResolver, PersistenceGateway,
    PromptRefiner,
};
use middleware::FixedWindowRateLimiter;
use storage::Stores;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<Catalog>,
    pub orchestrator: Arc<GenerationOrchestrator>,
    pub stores: Stores,
}

impl AppState {
    /// Wire every component from configuration
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let catalog = Arc::new(match &settings.presets_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin()?,
        });

        let stores = Stores::from_config(&settings.storage)?;
        let rate_limiter = Arc::new(FixedWindowRateLimiter::from_config(&settings.rate_limit));

        let refiner = PromptRefiner::new(
            Arc::new(HuggingFaceTextBackend::new(&settings.inference, &settings.refinement)?),
            &settings.refinement,
        );
        let synthesizer = ImageSynthesizer::new(
            Arc::new(HuggingFaceImageBackend::new(&settings.inference)?),
            catalog.clone(),
            &settings.inference,
        );

        let default_model = settings
            .inference
            .default_model_id()
            .ok_or_else(|| AppError::Internal("No default image model configured".to_string()))?
            .to_string();

        let orchestrator = GenerationOrchestrator::new(
            rate_limiter,
            refiner,
            NegativePromptResolver::new(catalog.clone()),
            synthesizer,
            PersistenceGateway::new(stores.clone()),
            default_model,
        );

        Ok(Self::new(settings, catalog, orchestrator, stores))
    }

    pub fn new(
        settings: Settings,
        catalog: Arc<Catalog>,
        orchestrator: GenerationOrchestrator,
        stores: Stores,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            catalog,
            orchestrator: Arc::new(orchestrator),
            stores,
        }
    }
}
