use super::FieldRecord;
use crate::rule::{parse_rule, Channel, RuleExpr, Value};
use tracing::warn;

/// How a field participates in repetition within its section.
///
/// Modelled as a sum type so "repeatable without a group" is unrepresentable:
/// a record claiming `group_is_repeatable` with no group id degrades to a
/// repeatable group of one, keyed by the field's own code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grouping {
    Singleton,
    Grouped { group_id: String },
    Repeatable { group_id: String },
}

impl Grouping {
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Grouping::Singleton => None,
            Grouping::Grouped { group_id } | Grouping::Repeatable { group_id } => Some(group_id),
        }
    }

    pub fn is_repeatable(&self) -> bool {
        matches!(self, Grouping::Repeatable { .. })
    }
}

/// The three independent per-channel mandatory flags of a field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MandatoryFlags {
    pub portal: bool,
    pub maker: bool,
    pub checker: bool,
}

impl MandatoryFlags {
    pub fn for_channel(&self, channel: Channel) -> bool {
        match channel {
            Channel::Portal => self.portal,
            Channel::Maker => self.maker,
            Channel::Checker => self.checker,
        }
    }
}

/// The atomic unit of dynamic-mode configuration, typed and with its
/// conditional rules compiled.
///
/// Display and data types are opaque to the engine and pass through verbatim
/// for the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub product_code: String,
    pub event_type: String,
    pub pane_code: String,
    pub section_code: String,
    pub field_code: String,

    pub display_sequence: u32,
    pub row: u32,
    pub column: u32,
    pub row_span: u32,
    pub column_span: u32,

    pub grouping: Grouping,
    pub display_type: Option<String>,
    pub data_type: Option<String>,
    pub lookup_code: Option<String>,
    pub dropdown_values: Vec<String>,
    pub max_length: Option<u32>,
    pub decimals: Option<u32>,
    pub default_value: Option<String>,
    pub mandatory: MandatoryFlags,

    pub visibility_rule: Option<RuleExpr>,
    pub mandatory_rule: Option<RuleExpr>,
}

impl FieldDefinition {
    /// Builds the typed definition from its raw store record.
    ///
    /// Rule expressions are compiled here, once. A malformed expression is
    /// logged and dropped, leaving the field on the rule kind's default.
    pub fn from_record(record: FieldRecord) -> Self {
        let grouping = match (record.group_id, record.group_is_repeatable) {
            (None, false) => Grouping::Singleton,
            (Some(group_id), false) => Grouping::Grouped { group_id },
            (Some(group_id), true) => Grouping::Repeatable { group_id },
            // Trust-the-feed degradation: a repeatable group of one.
            (None, true) => Grouping::Repeatable {
                group_id: record.field_code.clone(),
            },
        };

        let visibility_rule = compile_rule(
            &record.field_code,
            "visibility",
            record.conditional_visibility_expr.as_deref(),
        );
        let mandatory_rule = compile_rule(
            &record.field_code,
            "mandatory",
            record.conditional_mandatory_expr.as_deref(),
        );

        FieldDefinition {
            product_code: record.product_code,
            event_type: record.event_type,
            pane_code: record.pane_code,
            section_code: record.section_code,
            field_code: record.field_code,
            display_sequence: record.field_display_sequence,
            row: record.row,
            column: record.column,
            row_span: record.row_span,
            column_span: record.column_span,
            grouping,
            display_type: record.display_type,
            data_type: record.data_type,
            lookup_code: record.lookup_code,
            dropdown_values: record.dropdown_values.unwrap_or_default(),
            max_length: record.max_length,
            decimals: record.decimals,
            default_value: record.default_value,
            mandatory: MandatoryFlags {
                portal: record.portal_mandatory,
                maker: record.maker_mandatory,
                checker: record.checker_mandatory,
            },
            visibility_rule,
            mandatory_rule,
        }
    }

    /// The field's default value for seeding fresh state. Defaults are kept
    /// textual; rule evaluation coerces numeric text where needed.
    pub fn default_state_value(&self) -> Option<Value> {
        let raw = self.default_value.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(Value::Text(raw.to_string()))
    }
}

fn compile_rule(field_code: &str, kind: &'static str, expr: Option<&str>) -> Option<RuleExpr> {
    let raw = expr?.trim();
    if raw.is_empty() {
        return None;
    }
    match parse_rule(raw) {
        Ok(compiled) => Some(compiled),
        Err(error) => {
            warn!(field_code, kind, %error, "discarding malformed conditional rule");
            None
        }
    }
}
