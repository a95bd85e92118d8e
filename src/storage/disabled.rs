//! Stand-in used when no storage backend is configured

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::traits::{
    GenerationRow, LibraryFilter, NewGeneration, ObjectStore, RecordStore,
};

/// Fails every call with `StorageNotConfigured`
pub struct DisabledStore;

#[async_trait]
impl ObjectStore for DisabledStore {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn upload(&self, _key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<()> {
        Err(AppError::StorageNotConfigured)
    }

    fn public_url(&self, _key: &str) -> String {
        String::new()
    }
}

#[async_trait]
impl RecordStore for DisabledStore {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn insert(&self, _record: &NewGeneration) -> Result<GenerationRow> {
        Err(AppError::StorageNotConfigured)
    }

    async fn query(&self, _filter: &LibraryFilter) -> Result<Vec<GenerationRow>> {
        Err(AppError::StorageNotConfigured)
    }
}
