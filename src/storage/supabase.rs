//! Supabase Storage and PostgREST client

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::SupabaseConfig;
use crate::error::{AppError, Result};
use crate::storage::traits::{
    GenerationRow, LibraryFilter, NewGeneration, ObjectStore, RecordStore,
};

/// Shared connection to a Supabase project
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(url: &str, api_key: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Build from configuration; `None` when the URL or key is missing
    pub fn from_config(config: &SupabaseConfig) -> Result<Option<Self>> {
        match (config.resolve_url(), config.auth.resolve()) {
            (Some(url), Some(key)) => Ok(Some(Self::new(&url, &key, config.timeout_ms)?)),
            _ => Ok(None),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Storage(format!("{} failed with {}: {}", what, status, body)))
    }
}

/// Supabase Storage bucket
pub struct SupabaseObjectStore {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseObjectStore {
    pub fn new(client: SupabaseClient, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for SupabaseObjectStore {
    fn name(&self) -> &str {
        "supabase-storage"
    }

    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let url = format!("{}/storage/v1/object/{}/{}", self.client.url, self.bucket, key);
        debug!(bucket = %self.bucket, key = %key, size = bytes.len(), "Uploading object");

        let mut headers = self.client.headers();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type)
                .map_err(|e| AppError::Storage(format!("Invalid content type: {}", e)))?,
        );
        headers.insert("x-upsert", HeaderValue::from_static("false"));

        let response = self
            .client
            .client
            .post(&url)
            .headers(headers)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;

        SupabaseClient::check(response, "Upload").await?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.client.url, self.bucket, key
        )
    }
}

/// PostgREST table
pub struct SupabaseRecordStore {
    client: SupabaseClient,
    table: String,
}

impl SupabaseRecordStore {
    pub fn new(client: SupabaseClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.client.url, self.table)
    }
}

#[async_trait]
impl RecordStore for SupabaseRecordStore {
    fn name(&self) -> &str {
        "supabase-postgrest"
    }

    async fn insert(&self, record: &NewGeneration) -> Result<GenerationRow> {
        let mut headers = self.client.headers();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let response = self
            .client
            .client
            .post(self.table_url())
            .headers(headers)
            .json(record)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Insert request failed: {}", e)))?;

        let response = SupabaseClient::check(response, "Insert").await?;
        let rows: Vec<GenerationRow> = response.json().await.map_err(|e| {
            error!(table = %self.table, error = %e, "Failed to parse inserted row");
            AppError::Storage(format!("Failed to parse insert response: {}", e))
        })?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::Storage("Insert returned no rows".to_string()))
    }

    async fn query(&self, filter: &LibraryFilter) -> Result<Vec<GenerationRow>> {
        let mut params: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("user_id", format!("eq.{}", filter.user_id)),
            ("order", "created_at.desc".to_string()),
            ("offset", filter.offset.to_string()),
            ("limit", filter.limit.to_string()),
        ];
        if let Some(style) = &filter.style {
            params.push(("style", format!("eq.{}", style)));
        }
        if let Some(model) = &filter.model_version {
            params.push(("model_version", format!("eq.{}", model)));
        }

        let response = self
            .client
            .client
            .get(self.table_url())
            .headers(self.client.headers())
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Query request failed: {}", e)))?;

        let response = SupabaseClient::check(response, "Query").await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to parse query response: {}", e)))
    }
}
