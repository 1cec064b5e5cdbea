use super::{TemplateCache, TemplateKey, WorkflowTemplate};
use crate::store::TemplateStore;
use tracing::{debug, warn};

/// Resolves (product, event, trigger) triples to workflow templates through
/// the external store, caching per key.
pub struct TemplateResolver<S> {
    store: S,
    cache: TemplateCache,
}

impl<S: TemplateStore> TemplateResolver<S> {
    pub fn new(store: S, cache: TemplateCache) -> Self {
        Self { store, cache }
    }

    /// Looks up the template matching exactly on all three key components.
    ///
    /// Returns `None` for incomplete keys (without querying), when no template
    /// matches, and when the store fails: absence of configuration is the
    /// static-screen fallback, never an error.
    pub async fn resolve(&self, key: &TemplateKey) -> Option<WorkflowTemplate> {
        if !key.is_complete() {
            return None;
        }

        if let Some(hit) = self.cache.get(key) {
            debug!(%key, "template cache hit");
            return Some(hit);
        }

        let record = match self.store.find_template(key).await {
            Ok(record) => record?,
            Err(error) => {
                warn!(%key, %error, "template lookup failed; treating as no template");
                return None;
            }
        };

        let template = WorkflowTemplate::from_record(record);
        self.cache.insert(key.clone(), template.clone());
        Some(template)
    }

    /// Drops every cached template. Call before a resolution cycle that must
    /// observe administrator edits.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }
}
