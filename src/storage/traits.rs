//! Storage seams and the generations table shape

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Owner of every stored generation; the library is one shared collection
pub const PUBLIC_USER_ID: &str = "public";

/// Row of the `generations` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRow {
    pub id: String,
    pub user_id: String,
    pub original_prompt: String,
    pub refined_prompt: String,
    pub negative_prompt: String,
    pub image_url: String,
    pub style: String,
    pub aspect_ratio: String,
    pub model_version: String,
    #[serde(default)]
    pub processing_time: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns `id` and `created_at`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGeneration {
    pub user_id: String,
    pub original_prompt: String,
    pub refined_prompt: String,
    pub negative_prompt: String,
    pub image_url: String,
    pub style: String,
    pub aspect_ratio: String,
    pub model_version: String,
    pub processing_time: Option<u64>,
}

/// Library query: equality filters, newest first, `offset..offset + limit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFilter {
    pub user_id: String,
    pub style: Option<String>,
    pub model_version: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl LibraryFilter {
    pub fn public(offset: usize, limit: usize) -> Self {
        Self {
            user_id: PUBLIC_USER_ID.to_string(),
            style: None,
            model_version: None,
            offset,
            limit,
        }
    }

    /// Whether a row satisfies the equality filters
    pub fn matches(&self, row: &GenerationRow) -> bool {
        row.user_id == self.user_id
            && self.style.as_ref().map_or(true, |s| &row.style == s)
            && self
                .model_version
                .as_ref()
                .map_or(true, |m| &row.model_version == m)
    }
}

/// Blob storage for generated images
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;

    /// Store `bytes` under `key`; an existing key is an error
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Public URL for a stored key
    fn public_url(&self, key: &str) -> String;
}

/// Table storage for generation records
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn name(&self) -> &str;

    /// False when no backing database is configured
    fn is_configured(&self) -> bool {
        true
    }

    /// Insert a record and return it as stored
    async fn insert(&self, record: &NewGeneration) -> Result<GenerationRow>;

    /// Run a library query
    async fn query(&self, filter: &LibraryFilter) -> Result<Vec<GenerationRow>>;
}
