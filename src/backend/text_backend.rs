//! Text generation backend used for prompt refinement

use async_trait::async_trait;
use tracing::{debug, error};

use crate::backend::http_backend::{error_from_response, InferenceClient};
use crate::backend::traits::{GeneratedText, TextGenerationRequest, TextGenerator};
use crate::config::{InferenceConfig, RefinementConfig};
use crate::error::{AppError, Result};

/// Hugging Face text generation backend
pub struct HuggingFaceTextBackend {
    name: String,
    model: String,
    inner: InferenceClient,
}

impl HuggingFaceTextBackend {
    /// Create the backend; the refinement timeout bounds every call
    pub fn new(inference: &InferenceConfig, refinement: &RefinementConfig) -> Result<Self> {
        Ok(Self {
            name: "huggingface-text".to_string(),
            model: inference.text_model.clone(),
            inner: InferenceClient::new(
                &inference.base_url,
                inference.auth.resolve(),
                refinement.timeout_ms,
            )?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceTextBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_text(&self, request: &TextGenerationRequest) -> Result<Vec<GeneratedText>> {
        let url = self.inner.model_url(&self.model)?;
        debug!(backend = %self.name, model = %self.model, "Sending text generation request");

        let response = self
            .inner
            .http()
            .post(url)
            .headers(self.inner.headers())
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(&self.name, response).await);
        }

        response.json::<Vec<GeneratedText>>().await.map_err(|e| {
            error!(backend = %self.name, error = %e, "Failed to parse text generation response");
            AppError::BackendError(format!("Failed to parse response: {}", e))
        })
    }
}
