//! Gateway module - the generation pipeline and its stages

pub mod negative_prompt;
pub mod orchestrator;
pub mod persistence;
pub mod refiner;
pub mod synthesizer;

pub use negative_prompt::NegativePromptResolver;
pub use orchestrator::GenerationOrchestrator;
pub use persistence::{GenerationMetadata, PersistOutcome, PersistenceGateway};
pub use refiner::PromptRefiner;
pub use synthesizer::ImageSynthesizer;
