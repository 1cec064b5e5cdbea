use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// The (product, event, trigger) triple that selects a workflow template.
/// All three components are opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    pub product_code: String,
    pub event_code: String,
    pub trigger_type: String,
}

impl TemplateKey {
    pub fn new(
        product_code: impl Into<String>,
        event_code: impl Into<String>,
        trigger_type: impl Into<String>,
    ) -> Self {
        Self {
            product_code: product_code.into(),
            event_code: event_code.into(),
            trigger_type: trigger_type.into(),
        }
    }

    /// A key with any empty component never reaches the store.
    pub fn is_complete(&self) -> bool {
        !self.product_code.is_empty() && !self.event_code.is_empty() && !self.trigger_type.is_empty()
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.product_code, self.event_code, self.trigger_type
        )
    }
}

/// Whether a stage's screen is assembled from fixed components or from field
/// metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Static,
    Dynamic,
}

impl RenderMode {
    /// Parses the store's render-mode string. Absent stays absent (the decider
    /// defaults it to static at decision time); unknown values are logged and
    /// treated as absent.
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            None => None,
            Some(s) if s.eq_ignore_ascii_case("static") => Some(RenderMode::Static),
            Some(s) if s.eq_ignore_ascii_case("dynamic") => Some(RenderMode::Dynamic),
            Some(other) => {
                warn!(ui_render_mode = other, "unknown render mode in stage record");
                None
            }
        }
    }
}

/// A workflow stage row as returned by the template store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    pub name: String,
    pub ordinal: u32,
    #[serde(default)]
    pub ui_render_mode: Option<String>,
}

/// A workflow template row with its nested stage records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub template_id: String,
    pub product_code: String,
    pub event_code: String,
    pub trigger_type: String,
    #[serde(default)]
    pub stages: Vec<StageRecord>,
}

/// A named step within a workflow template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowStage {
    pub name: String,
    pub ordinal: u32,
    pub render_mode: Option<RenderMode>,
}

/// A resolved workflow template. Immutable once fetched; a cache clear causes
/// a re-fetch, never a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTemplate {
    pub id: String,
    pub key: TemplateKey,
    stages: Vec<WorkflowStage>,
}

impl WorkflowTemplate {
    pub fn from_record(record: TemplateRecord) -> Self {
        let mut stages: Vec<WorkflowStage> = record
            .stages
            .into_iter()
            .map(|stage| WorkflowStage {
                render_mode: RenderMode::parse(stage.ui_render_mode.as_deref()),
                name: stage.name,
                ordinal: stage.ordinal,
            })
            .collect();
        stages.sort_by_key(|stage| stage.ordinal);

        Self {
            id: record.template_id,
            key: TemplateKey::new(record.product_code, record.event_code, record.trigger_type),
            stages,
        }
    }

    /// Stages in source-defined ordinal order.
    pub fn stages(&self) -> &[WorkflowStage] {
        &self.stages
    }

    /// Exact-name stage lookup; `None` is "no stage selected" and must
    /// propagate, never default.
    pub fn stage(&self, name: &str) -> Option<&WorkflowStage> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    pub fn first_stage(&self) -> Option<&WorkflowStage> {
        self.stages.first()
    }
}
