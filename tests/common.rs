//! Common test utilities: field/template fixtures and in-memory stores.
use async_trait::async_trait;
use kumiko::error::StoreError;
use kumiko::metadata::{FieldDefinition, FieldRecord};
use kumiko::store::{FieldMetadataStore, TemplateStore};
use kumiko::workflow::{StageRecord, TemplateKey, TemplateRecord};

/// Routes engine tracing through the capture-aware test writer so degradation
/// warnings show up in failing-test output. Safe to call more than once.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A minimal active field record; tests adjust the fields they care about.
#[allow(dead_code)]
pub fn field_record(pane: &str, section: &str, code: &str) -> FieldRecord {
    FieldRecord {
        product_code: "ILC".to_string(),
        event_type: "ISSUE".to_string(),
        pane_code: pane.to_string(),
        section_code: section.to_string(),
        field_code: code.to_string(),
        field_display_sequence: 0,
        row: 0,
        column: 0,
        row_span: 1,
        column_span: 1,
        group_id: None,
        group_is_repeatable: false,
        display_type: None,
        data_type: None,
        lookup_code: None,
        dropdown_values: None,
        max_length: None,
        decimals: None,
        default_value: None,
        portal_mandatory: false,
        maker_mandatory: false,
        checker_mandatory: false,
        conditional_visibility_expr: None,
        conditional_mandatory_expr: None,
        active: true,
    }
}

#[allow(dead_code)]
pub fn field(pane: &str, section: &str, code: &str) -> FieldDefinition {
    FieldDefinition::from_record(field_record(pane, section, code))
}

#[allow(dead_code)]
pub fn grouped_field(
    pane: &str,
    section: &str,
    code: &str,
    group_id: &str,
    repeatable: bool,
) -> FieldDefinition {
    let mut record = field_record(pane, section, code);
    record.group_id = Some(group_id.to_string());
    record.group_is_repeatable = repeatable;
    FieldDefinition::from_record(record)
}

/// The template used throughout: stage "draft" is dynamic, stage "approve"
/// carries no explicit render mode.
#[allow(dead_code)]
pub fn issuance_template() -> TemplateRecord {
    TemplateRecord {
        template_id: "WF-0001".to_string(),
        product_code: "ILC".to_string(),
        event_code: "ISSUE".to_string(),
        trigger_type: "CLIENT_PORTAL".to_string(),
        stages: vec![
            StageRecord {
                name: "draft".to_string(),
                ordinal: 1,
                ui_render_mode: Some("dynamic".to_string()),
            },
            StageRecord {
                name: "approve".to_string(),
                ordinal: 2,
                ui_render_mode: None,
            },
        ],
    }
}

/// Template store over a fixed record list. Yields once before answering so
/// engine tests get a real suspension point.
pub struct InMemoryTemplateStore {
    pub templates: Vec<TemplateRecord>,
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn find_template(
        &self,
        key: &TemplateKey,
    ) -> Result<Option<TemplateRecord>, StoreError> {
        tokio::task::yield_now().await;
        Ok(self
            .templates
            .iter()
            .find(|t| {
                t.product_code == key.product_code
                    && t.event_code == key.event_code
                    && t.trigger_type == key.trigger_type
            })
            .cloned())
    }
}

/// Field store over a fixed record list.
pub struct InMemoryFieldStore {
    pub records: Vec<FieldRecord>,
}

#[async_trait]
impl FieldMetadataStore for InMemoryFieldStore {
    async fn find_fields(
        &self,
        product_code: &str,
        event_type: &str,
        pane_code: Option<&str>,
    ) -> Result<Vec<FieldRecord>, StoreError> {
        tokio::task::yield_now().await;
        Ok(self
            .records
            .iter()
            .filter(|r| r.product_code == product_code && r.event_type == event_type)
            .filter(|r| pane_code.map_or(true, |pane| r.pane_code == pane))
            .cloned()
            .collect())
    }
}

/// Stores that always fail, for degradation tests.
pub struct FailingTemplateStore;

#[async_trait]
impl TemplateStore for FailingTemplateStore {
    async fn find_template(
        &self,
        _key: &TemplateKey,
    ) -> Result<Option<TemplateRecord>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub struct FailingFieldStore;

#[async_trait]
impl FieldMetadataStore for FailingFieldStore {
    async fn find_fields(
        &self,
        _product_code: &str,
        _event_type: &str,
        _pane_code: Option<&str>,
    ) -> Result<Vec<FieldRecord>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}
