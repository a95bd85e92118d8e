//! HTTP client for the Hugging Face Inference API

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, Url,
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::traits::{ImageGenerationRequest, ImageGenerator};
use crate::config::InferenceConfig;
use crate::error::{AppError, Result};

/// Connection details shared by the text and image backends
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl InferenceClient {
    /// Create a client with its own request timeout
    pub fn new(base_url: &str, auth_token: Option<String>, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    /// Endpoint for a model, e.g. `{base}/models/black-forest-labs/FLUX.1-dev`.
    /// Each segment of the id is percent-encoded; empty and dot segments are rejected.
    pub fn model_url(&self, model: &str) -> Result<Url> {
        let segments: Vec<&str> = model.trim_matches('/').split('/').collect();
        if segments.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
            return Err(AppError::BackendError(format!("Invalid model id '{}'", model)));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Internal(format!("Invalid inference base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Inference base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .push("models")
            .extend(segments);
        Ok(url)
    }

    /// JSON headers with Bearer authentication when a token is configured
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    pub fn http(&self) -> &Client {
        &self.client
    }
}

/// Turn a non-success response into a backend error carrying status and body
pub(crate) async fn error_from_response(backend: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(backend = %backend, status = %status, "Inference API returned an error");
    AppError::BackendError(format!("Backend returned {}: {}", status, body))
}

/// Text-to-image backend returning raw PNG bytes
pub struct HuggingFaceImageBackend {
    name: String,
    inner: InferenceClient,
}

impl HuggingFaceImageBackend {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        Ok(Self {
            name: "huggingface-image".to_string(),
            inner: InferenceClient::new(&config.base_url, config.auth.resolve(), config.timeout_ms)?,
        })
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceImageBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_image(&self, model: &str, request: &ImageGenerationRequest) -> Result<Vec<u8>> {
        let url = self.inner.model_url(model)?;
        debug!(
            backend = %self.name,
            model = %model,
            width = request.parameters.width,
            height = request.parameters.height,
            "Sending image generation request"
        );

        let mut headers = self.inner.headers();
        headers.insert(ACCEPT, HeaderValue::from_static("image/png"));

        let response = self
            .inner
            .http()
            .post(url)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(&self.name, response).await);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::BackendError(
                "Inference API returned an empty image".to_string(),
            ));
        }

        Ok(bytes.to_vec())
    }
}
