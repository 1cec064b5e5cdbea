use serde::{Deserialize, Serialize};

/// A field definition row as returned by the metadata store.
///
/// The feed treats nearly everything as optional, so this record mirrors that
/// shape verbatim. The typed model the engine works with is built by
/// [`FieldDefinition::from_record`](super::FieldDefinition::from_record).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub product_code: String,
    pub event_type: String,
    pub pane_code: String,
    pub section_code: String,
    pub field_code: String,

    #[serde(default)]
    pub field_display_sequence: u32,
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default = "default_span")]
    pub row_span: u32,
    #[serde(default = "default_span")]
    pub column_span: u32,

    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub group_is_repeatable: bool,

    #[serde(default)]
    pub display_type: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub lookup_code: Option<String>,
    #[serde(default)]
    pub dropdown_values: Option<Vec<String>>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub default_value: Option<String>,

    #[serde(default)]
    pub portal_mandatory: bool,
    #[serde(default)]
    pub maker_mandatory: bool,
    #[serde(default)]
    pub checker_mandatory: bool,

    #[serde(default)]
    pub conditional_visibility_expr: Option<String>,
    #[serde(default)]
    pub conditional_mandatory_expr: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_span() -> u32 {
    1
}

fn default_active() -> bool {
    true
}
