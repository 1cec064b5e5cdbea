//! Interfaces to the external template and field-metadata stores.
//!
//! The engine owns no network protocol; hosting code implements these traits
//! over its request/response client. Store failures are converted to the
//! not-found shape at the resolver/repository boundary, so implementations
//! should report them, not swallow them.

use crate::error::StoreError;
use crate::metadata::FieldRecord;
use crate::workflow::{TemplateKey, TemplateRecord};
use async_trait::async_trait;

/// Backing store for workflow templates and their nested stage records.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Zero-or-one template matching exactly on all three key components.
    /// Duplicate rows are a configuration-integrity issue: first match wins.
    async fn find_template(&self, key: &TemplateKey)
        -> Result<Option<TemplateRecord>, StoreError>;
}

/// Backing store for field definition records.
#[async_trait]
pub trait FieldMetadataStore: Send + Sync {
    async fn find_fields(
        &self,
        product_code: &str,
        event_type: &str,
        pane_code: Option<&str>,
    ) -> Result<Vec<FieldRecord>, StoreError>;
}
