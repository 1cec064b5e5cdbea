use super::{TemplateKey, WorkflowTemplate};
use ahash::AHashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Explicit template cache handed to the resolver at construction.
///
/// The engine never invalidates it on its own: templates can be edited by
/// administrators between uses, so callers clear it at the start of every
/// resolution cycle they require to be fresh.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: Mutex<AHashMap<TemplateKey, WorkflowTemplate>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TemplateKey) -> Option<WorkflowTemplate> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: TemplateKey, template: WorkflowTemplate) {
        self.lock().insert(key, template);
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        if !entries.is_empty() {
            debug!(evicted = entries.len(), "clearing template cache");
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AHashMap<TemplateKey, WorkflowTemplate>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
