use super::FieldDefinition;
use crate::store::FieldMetadataStore;
use tracing::warn;

/// Supplies the active, typed field definitions for a product/event/pane.
pub struct FieldMetadataRepository<S> {
    store: S,
}

impl<S: FieldMetadataStore> FieldMetadataRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetches and converts field definitions.
    ///
    /// "No fields" is a valid, renderable empty screen, so every failure path
    /// lands on an empty list: a store error is logged and absorbed here, and
    /// inactive records never reach the caller.
    pub async fn fetch(
        &self,
        product_code: &str,
        event_type: &str,
        pane_code: Option<&str>,
    ) -> Vec<FieldDefinition> {
        let records = match self.store.find_fields(product_code, event_type, pane_code).await {
            Ok(records) => records,
            Err(error) => {
                warn!(
                    product_code,
                    event_type,
                    pane_code,
                    %error,
                    "field metadata fetch failed; rendering empty screen"
                );
                return Vec::new();
            }
        };

        records
            .into_iter()
            .filter(|record| record.active)
            .map(FieldDefinition::from_record)
            .collect()
    }
}
