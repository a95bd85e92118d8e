//! Client-side generation history
//!
//! A newest-first list of recent generations capped at `max_items`, stored as
//! JSON under a fixed key. Overflow drops the oldest entries without notice,
//! and entries older than `expiry_days` are dropped when the list is loaded.
//!
//! This is the client-side store a front end or CLI keeps next to the user.
//! The gateway itself never reads or writes it; no handler or startup path
//! touches `Settings.history`, which only parameterizes this module.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::api::models::GenerationRecord;
use crate::config::HistoryConfig;
use crate::error::Result;

/// Cached copy of a generation response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationHistoryItem {
    pub id: String,
    pub image_url: String,
    pub original_prompt: String,
    pub refined_prompt: String,
    pub negative_prompt: String,
    pub style: String,
    pub aspect_ratio: String,
    pub model_version: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl From<GenerationRecord> for GenerationHistoryItem {
    fn from(record: GenerationRecord) -> Self {
        Self {
            id: record.id,
            image_url: record.image_url,
            original_prompt: record.original_prompt,
            refined_prompt: record.refined_prompt,
            negative_prompt: record.negative_prompt,
            style: record.style,
            aspect_ratio: record.aspect_ratio,
            model_version: record.model_version,
            created_at: record.created_at,
            processing_time_ms: record.processing_time_ms,
        }
    }
}

/// Bounded, newest-first list
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationHistory {
    items: Vec<GenerationHistoryItem>,
    max_items: usize,
}

impl GenerationHistory {
    pub fn new(max_items: usize) -> Self {
        Self {
            items: Vec::new(),
            max_items: max_items.max(1),
        }
    }

    /// Wrap existing items (assumed newest first), truncating to the bound
    pub fn from_items(mut items: Vec<GenerationHistoryItem>, max_items: usize) -> Self {
        let max_items = max_items.max(1);
        items.truncate(max_items);
        Self { items, max_items }
    }

    /// Put `item` at the front, dropping the oldest entries beyond the bound
    pub fn push(&mut self, item: GenerationHistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(self.max_items);
    }

    /// Drop entries created before `now - max_age`
    pub fn prune_older_than(&mut self, now: DateTime<Utc>, max_age: Duration) {
        let cutoff = now - max_age;
        self.items.retain(|item| item.created_at >= cutoff);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[GenerationHistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }
}

/// History persisted as `<dir>/<storage_key>.json`
pub struct LocalHistoryStore {
    path: PathBuf,
    max_items: usize,
    expiry: Duration,
}

impl LocalHistoryStore {
    pub fn new<P: AsRef<Path>>(dir: P, config: &HistoryConfig) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", config.storage_key)),
            max_items: config.max_items,
            expiry: Duration::days(config.expiry_days),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the list; a missing or unreadable file yields an empty history
    pub fn load(&self) -> GenerationHistory {
        let items = match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Vec<GenerationHistoryItem>>(&content) {
                Ok(items) => items,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Error loading history");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Error loading history");
                Vec::new()
            }
        };

        let mut history = GenerationHistory::from_items(items, self.max_items);
        history.prune_older_than(Utc::now(), self.expiry);
        history
    }

    /// Prepend a generation and write the list back
    pub fn record(&self, record: GenerationRecord) -> Result<GenerationHistory> {
        let mut history = self.load();
        history.push(record.into());
        self.save(&history)?;
        Ok(history)
    }

    pub fn save(&self, history: &GenerationHistory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(history.items())?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Remove the stored list
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
