//! Images on local disk, served by the gateway itself under `/images`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::response::UrlHandler;
use crate::storage::traits::ObjectStore;

pub struct LocalObjectStore {
    base_path: PathBuf,
    urls: UrlHandler,
}

impl LocalObjectStore {
    pub fn new<P: AsRef<Path>>(base_path: P, url_prefix: &str) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            urls: UrlHandler::new(url_prefix),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(AppError::Storage(format!("Invalid object key '{}'", key)));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn name(&self) -> &str {
        "local-disk"
    }

    async fn upload(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Cannot create {}: {}", path.display(), e)))?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        debug!(path = %path.display(), size = bytes.len(), "Stored image on disk");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.urls.public_url(key)
    }
}
