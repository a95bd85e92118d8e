//! Storage module - object storage and generation records

pub mod disabled;
pub mod local;
pub mod memory;
pub mod supabase;
pub mod traits;

pub use disabled::DisabledStore;
pub use local::LocalObjectStore;
pub use memory::MemoryRecordStore;
pub use supabase::{SupabaseClient, SupabaseObjectStore, SupabaseRecordStore};
pub use traits::{
    GenerationRow, LibraryFilter, NewGeneration, ObjectStore, RecordStore, PUBLIC_USER_ID,
};

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{StorageBackendKind, StorageConfig};
use crate::error::Result;

/// The pair of stores a deployment writes to
#[derive(Clone)]
pub struct Stores {
    pub kind: StorageBackendKind,
    pub objects: Arc<dyn ObjectStore>,
    pub records: Arc<dyn RecordStore>,
}

impl Stores {
    pub fn disabled() -> Self {
        Self {
            kind: StorageBackendKind::Disabled,
            objects: Arc::new(DisabledStore),
            records: Arc::new(DisabledStore),
        }
    }

    /// Build the stores named by configuration. A Supabase backend without
    /// credentials is downgraded to disabled rather than failing startup.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let stores = match config.backend {
            StorageBackendKind::Supabase => match SupabaseClient::from_config(&config.supabase)? {
                Some(client) => Self {
                    kind: StorageBackendKind::Supabase,
                    objects: Arc::new(SupabaseObjectStore::new(
                        client.clone(),
                        &config.supabase.bucket,
                    )),
                    records: Arc::new(SupabaseRecordStore::new(client, &config.supabase.table)),
                },
                None => {
                    warn!(
                        url_env = %config.supabase.url_env,
                        "Supabase URL or key not configured, storage disabled"
                    );
                    Self::disabled()
                }
            },
            StorageBackendKind::Local => Self {
                kind: StorageBackendKind::Local,
                objects: Arc::new(LocalObjectStore::new(
                    &config.local.base_path,
                    &config.local.url_prefix,
                )),
                records: Arc::new(MemoryRecordStore::new()),
            },
            StorageBackendKind::Disabled => Self::disabled(),
        };

        info!(backend = %stores.kind, "Storage initialized");
        Ok(stores)
    }
}
