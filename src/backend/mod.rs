//! Backend module - inference API clients and the traits they implement

pub mod http_backend;
pub mod text_backend;
pub mod traits;

pub use http_backend::{HuggingFaceImageBackend, InferenceClient};
pub use text_backend::HuggingFaceTextBackend;
pub use traits::{
    GeneratedText, ImageGenerationParameters, ImageGenerationRequest, ImageGenerator,
    InferenceOptions, TextGenerationParameters, TextGenerationRequest, TextGenerator,
};
