use super::{RenderMode, WorkflowStage, WorkflowTemplate};

/// The outcome of a render-mode decision for one screen mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDecision {
    pub has_template: bool,
    pub stages: Vec<WorkflowStage>,
    pub render_mode: Option<RenderMode>,
    pub current_stage: Option<WorkflowStage>,
}

impl RenderDecision {
    fn no_template() -> Self {
        Self {
            has_template: false,
            stages: Vec::new(),
            render_mode: None,
            current_stage: None,
        }
    }
}

/// Decides which stage a screen mount lands on and how it renders.
///
/// Pure given its inputs, so it stays testable apart from the fetch feeding it.
///
/// - No template: no decision at all.
/// - An explicit target that does not resolve selects nothing. That is a
///   distinct, reportable condition from "no target given" and must not fall
///   back to the first stage.
/// - No target (the new-transaction case): the first stage in ordinal order.
/// - A selected stage without an explicit mode renders static.
pub fn decide(template: Option<&WorkflowTemplate>, target_stage: Option<&str>) -> RenderDecision {
    let Some(template) = template else {
        return RenderDecision::no_template();
    };

    let selected = match target_stage {
        Some(name) => template.stage(name),
        None => template.first_stage(),
    };

    RenderDecision {
        has_template: true,
        stages: template.stages().to_vec(),
        render_mode: selected.map(|stage| stage.render_mode.unwrap_or(RenderMode::Static)),
        current_stage: selected.cloned(),
    }
}
