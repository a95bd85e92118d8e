//! Negative prompt lookup

use std::sync::Arc;

use crate::config::Catalog;

/// Maps a style id to its negative prompt. Total: unknown styles get the
/// default style's entry.
#[derive(Clone)]
pub struct NegativePromptResolver {
    catalog: Arc<Catalog>,
}

impl NegativePromptResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, style_id: &str) -> &str {
        &self.catalog.style(style_id).negative_prompt
    }
}
