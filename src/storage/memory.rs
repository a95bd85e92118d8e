//! In-process generation records

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::storage::traits::{GenerationRow, LibraryFilter, NewGeneration, RecordStore};

/// Records kept in memory for the lifetime of the process
#[derive(Default)]
pub struct MemoryRecordStore {
    rows: RwLock<Vec<GenerationRow>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, record: &NewGeneration) -> Result<GenerationRow> {
        let row = GenerationRow {
            id: Uuid::new_v4().to_string(),
            user_id: record.user_id.clone(),
            original_prompt: record.original_prompt.clone(),
            refined_prompt: record.refined_prompt.clone(),
            negative_prompt: record.negative_prompt.clone(),
            image_url: record.image_url.clone(),
            style: record.style.clone(),
            aspect_ratio: record.aspect_ratio.clone(),
            model_version: record.model_version.clone(),
            processing_time: record.processing_time,
            created_at: Utc::now(),
        };

        self.rows.write().push(row.clone());
        Ok(row)
    }

    async fn query(&self, filter: &LibraryFilter) -> Result<Vec<GenerationRow>> {
        let rows = self.rows.read();

        // Stable sort keeps insertion order for identical timestamps, so reverse first.
        let mut matching: Vec<GenerationRow> = rows
            .iter()
            .rev()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }
}
