//! Best-effort persistence of generated images
//!
//! Upload and insert are independent attempts: a failed upload still gets a
//! record (pointing at the inline image), a failed insert still keeps the
//! uploaded URL. Neither failure reaches the caller.

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use tracing::{info, warn};

use crate::response::data_uri::{self, IMAGE_MIME_TYPE};
use crate::storage::{NewGeneration, Stores, PUBLIC_USER_ID};

const RANDOM_SUFFIX_LEN: usize = 13;

/// What the pipeline knows about a generation when it is saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationMetadata {
    pub original_prompt: String,
    pub refined_prompt: String,
    pub negative_prompt: String,
    pub style: String,
    pub aspect_ratio: String,
    pub model_version: String,
    pub processing_time_ms: u64,
}

/// Result of a persistence attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Id assigned by the record store, if the insert succeeded
    pub id: Option<String>,
    /// Public URL of the upload, or the inline data URI it replaces
    pub public_url: String,
    /// Timestamp assigned by the record store
    pub created_at: Option<DateTime<Utc>>,
}

pub struct PersistenceGateway {
    stores: Stores,
}

impl PersistenceGateway {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Save the image and its record; degrades instead of failing
    pub async fn persist(&self, image_data_uri: &str, metadata: &GenerationMetadata) -> PersistOutcome {
        let public_url = self.upload(image_data_uri).await;

        let record = NewGeneration {
            user_id: PUBLIC_USER_ID.to_string(),
            original_prompt: metadata.original_prompt.clone(),
            refined_prompt: metadata.refined_prompt.clone(),
            negative_prompt: metadata.negative_prompt.clone(),
            image_url: public_url.clone(),
            style: metadata.style.clone(),
            aspect_ratio: metadata.aspect_ratio.clone(),
            model_version: metadata.model_version.clone(),
            processing_time: Some(metadata.processing_time_ms),
        };

        match self.stores.records.insert(&record).await {
            Ok(row) => {
                info!(id = %row.id, store = %self.stores.records.name(), "Generation saved");
                PersistOutcome {
                    id: Some(row.id),
                    public_url,
                    created_at: Some(row.created_at),
                }
            }
            Err(e) => {
                warn!(store = %self.stores.records.name(), error = %e, "Database save failed");
                PersistOutcome {
                    id: None,
                    public_url,
                    created_at: None,
                }
            }
        }
    }

    /// Upload the decoded image; returns its public URL or the data URI itself
    async fn upload(&self, image_data_uri: &str) -> String {
        let bytes = match data_uri::decode(image_data_uri) {
            Ok((_, bytes)) => bytes,
            Err(e) => {
                warn!(error = %e, "Generated image is not a valid data URI, skipping upload");
                return image_data_uri.to_string();
            }
        };

        let key = object_key(Utc::now().timestamp_millis());
        match self.stores.objects.upload(&key, bytes, IMAGE_MIME_TYPE).await {
            Ok(()) => self.stores.objects.public_url(&key),
            Err(e) => {
                warn!(store = %self.stores.objects.name(), key = %key, error = %e, "Storage upload failed");
                image_data_uri.to_string()
            }
        }
    }
}

/// `generation-<millis>-<random>.png`
pub fn object_key(timestamp_millis: i64) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("generation-{}-{}.png", timestamp_millis, suffix)
}
