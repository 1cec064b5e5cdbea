use super::{evaluate, RuleExpr, RuleKind, StateLookup};
use crate::error::EvaluationError;
use crate::layout::PaneFields;
use crate::metadata::FieldDefinition;
use crate::state::{DynamicFormState, InstanceId};
use ahash::AHashMap;
use tracing::warn;

/// The channel a screen is rendered for; selects which static mandatory flag
/// of a field definition applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Portal,
    Maker,
    Checker,
}

/// One failed rule evaluation. Failures are collected and logged, never
/// propagated: the rest of the pane keeps its flags.
#[derive(Debug, Clone)]
pub struct RuleFailure {
    pub field_code: String,
    pub kind: RuleKind,
    pub instance: Option<InstanceId>,
    pub error: EvaluationError,
}

/// Per-field visibility and mandatory flags for a composed layout, recomputed
/// from the full state snapshot on every change.
///
/// Fields in repeatable groups are flagged per instance: their rules read the
/// instance's own data bag first and fall back to the singleton form data, so
/// each row of a grid stands on its own values.
#[derive(Debug, Clone, Default)]
pub struct FieldFlags {
    pub visible: AHashMap<String, bool>,
    pub mandatory: AHashMap<String, bool>,
    pub instance_visible: AHashMap<(InstanceId, String), bool>,
    pub instance_mandatory: AHashMap<(InstanceId, String), bool>,
    pub failures: Vec<RuleFailure>,
}

impl FieldFlags {
    /// Evaluates every field's conditional rules against the current state.
    ///
    /// A field is mandatory when its static flag for the channel is set or its
    /// mandatory rule holds. Broken expressions fail closed to the rule kind's
    /// default and are recorded in `failures`.
    pub fn evaluate(panes: &[PaneFields], state: &DynamicFormState, channel: Channel) -> Self {
        let mut flags = FieldFlags::default();
        let groups = panes
            .iter()
            .flat_map(|pane| pane.sections.iter())
            .flat_map(|section| section.groups.iter());
        for group in groups {
            match (&group.group_id, group.repeatable) {
                (Some(group_id), true) => {
                    for instance in state.group_instances(group_id) {
                        let lookup = |code: &str| {
                            instance.data.get(code).cloned().or_else(|| state.value(code))
                        };
                        for field in &group.fields {
                            let (visible, mandatory) =
                                flags.field_flags(field, channel, &lookup, Some(instance.id));
                            let key = (instance.id, field.field_code.clone());
                            flags.instance_visible.insert(key.clone(), visible);
                            flags.instance_mandatory.insert(key, mandatory);
                        }
                    }
                }
                _ => {
                    for field in &group.fields {
                        let (visible, mandatory) = flags.field_flags(
                            field,
                            channel,
                            &|code: &str| state.value(code),
                            None,
                        );
                        flags.visible.insert(field.field_code.clone(), visible);
                        flags.mandatory.insert(field.field_code.clone(), mandatory);
                    }
                }
            }
        }
        flags
    }

    pub fn is_visible(&self, field_code: &str) -> bool {
        self.visible.get(field_code).copied().unwrap_or(true)
    }

    pub fn is_mandatory(&self, field_code: &str) -> bool {
        self.mandatory.get(field_code).copied().unwrap_or(false)
    }

    pub fn is_instance_visible(&self, instance_id: InstanceId, field_code: &str) -> bool {
        self.instance_visible
            .get(&(instance_id, field_code.to_string()))
            .copied()
            .unwrap_or(true)
    }

    pub fn is_instance_mandatory(&self, instance_id: InstanceId, field_code: &str) -> bool {
        self.instance_mandatory
            .get(&(instance_id, field_code.to_string()))
            .copied()
            .unwrap_or(false)
    }

    fn field_flags(
        &mut self,
        field: &FieldDefinition,
        channel: Channel,
        lookup: &impl StateLookup,
        instance: Option<InstanceId>,
    ) -> (bool, bool) {
        let visible = self.run(
            field,
            RuleKind::Visibility,
            field.visibility_rule.as_ref(),
            lookup,
            instance,
        );
        let ruled = self.run(
            field,
            RuleKind::Mandatory,
            field.mandatory_rule.as_ref(),
            lookup,
            instance,
        );
        (visible, field.mandatory.for_channel(channel) || ruled)
    }

    fn run(
        &mut self,
        field: &FieldDefinition,
        kind: RuleKind,
        rule: Option<&RuleExpr>,
        lookup: &impl StateLookup,
        instance: Option<InstanceId>,
    ) -> bool {
        let Some(expr) = rule else {
            return kind.default_outcome();
        };
        match evaluate(expr, lookup) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(
                    field_code = %field.field_code,
                    ?kind,
                    ?instance,
                    %error,
                    "conditional rule failed; falling back to default"
                );
                self.failures.push(RuleFailure {
                    field_code: field.field_code.clone(),
                    kind,
                    instance,
                    error,
                });
                kind.default_outcome()
            }
        }
    }
}
