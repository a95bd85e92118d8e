//! Public URLs for images kept on local disk

/// Maps stored object keys to the URLs they are served under
#[derive(Debug, Clone)]
pub struct UrlHandler {
    url_prefix: String,
}

impl UrlHandler {
    pub fn new(url_prefix: &str) -> Self {
        Self {
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// URL for an object key; path separators in the key are kept
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_prefix, key.trim_start_matches('/'))
    }

    pub fn prefix(&self) -> &str {
        &self.url_prefix
    }
}
