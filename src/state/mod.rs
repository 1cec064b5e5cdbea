use crate::layout::PaneFields;
use crate::rule::Value;
use ahash::{AHashMap, AHashSet};
use tracing::warn;
use uuid::Uuid;

pub type InstanceId = Uuid;

/// One occurrence of a repeatable group, with its own data bag.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatableGroupInstance {
    pub id: InstanceId,
    pub data: AHashMap<String, Value>,
}

/// The live data of a dynamic screen: singleton field values plus the
/// instances of each repeatable group.
///
/// Mutation operations are snapshot-style: each returns a new state and leaves
/// the previous one valid and unaffected. When the layout changes (product or
/// event switch), build a fresh state with [`DynamicFormState::for_layout`]
/// rather than merging; a recycled group id must never resurrect data from a
/// previous screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicFormState {
    form_data: AHashMap<String, Value>,
    repeatable_groups: AHashMap<String, Vec<RepeatableGroupInstance>>,
    repeatable_ids: AHashSet<String>,
    group_defaults: AHashMap<String, AHashMap<String, Value>>,
}

impl DynamicFormState {
    /// An empty state with no known repeatable groups, for static screens.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh state for a composed layout: records which group ids are
    /// repeatable and seeds default values, singleton fields into `form_data`
    /// and repeatable-group fields into the bag each new instance starts from.
    pub fn for_layout(panes: &[PaneFields]) -> Self {
        let mut state = Self::default();
        for group in panes
            .iter()
            .flat_map(|pane| pane.sections.iter())
            .flat_map(|section| section.groups.iter())
        {
            if group.repeatable {
                let group_id = match &group.group_id {
                    Some(id) => id.clone(),
                    None => continue,
                };
                let defaults: AHashMap<String, Value> = group
                    .fields
                    .iter()
                    .filter_map(|f| Some((f.field_code.clone(), f.default_state_value()?)))
                    .collect();
                state.repeatable_ids.insert(group_id.clone());
                state.group_defaults.insert(group_id, defaults);
            } else {
                for field in &group.fields {
                    if let Some(value) = field.default_state_value() {
                        state.form_data.insert(field.field_code.clone(), value);
                    }
                }
            }
        }
        state
    }

    pub fn value(&self, field_code: &str) -> Option<Value> {
        self.form_data.get(field_code).cloned()
    }

    pub fn form_data(&self) -> &AHashMap<String, Value> {
        &self.form_data
    }

    /// Instances of a repeatable group, in insertion order.
    pub fn group_instances(&self, group_id: &str) -> &[RepeatableGroupInstance] {
        self.repeatable_groups
            .get(group_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn instance_value(
        &self,
        group_id: &str,
        instance_id: InstanceId,
        field_code: &str,
    ) -> Option<Value> {
        self.repeatable_groups
            .get(group_id)?
            .iter()
            .find(|instance| instance.id == instance_id)?
            .data
            .get(field_code)
            .cloned()
    }

    /// Replaces a singleton field's value in a new snapshot.
    #[must_use]
    pub fn set_field(&self, field_code: &str, value: Value) -> Self {
        let mut next = self.clone();
        next.form_data.insert(field_code.to_string(), value);
        next
    }

    /// Appends a new instance to a repeatable group.
    ///
    /// Adding to a group the layout does not mark repeatable is a UI-wiring
    /// bug, not a runtime condition: it is rejected as a no-op with no id.
    #[must_use]
    pub fn add_group_instance(&self, group_id: &str) -> (Self, Option<InstanceId>) {
        if !self.repeatable_ids.contains(group_id) {
            warn!(group_id, "ignoring instance add for a non-repeatable group");
            return (self.clone(), None);
        }

        let instance = RepeatableGroupInstance {
            id: Uuid::new_v4(),
            data: self.group_defaults.get(group_id).cloned().unwrap_or_default(),
        };
        let id = instance.id;

        let mut next = self.clone();
        next.repeatable_groups
            .entry(group_id.to_string())
            .or_default()
            .push(instance);
        (next, Some(id))
    }

    /// Removes exactly the matching instance; no-op when it is not found.
    #[must_use]
    pub fn remove_group_instance(&self, group_id: &str, instance_id: InstanceId) -> Self {
        let mut next = self.clone();
        if let Some(instances) = next.repeatable_groups.get_mut(group_id) {
            instances.retain(|instance| instance.id != instance_id);
        }
        next
    }

    /// Sets a value inside one instance's data bag, touching nothing else.
    #[must_use]
    pub fn set_instance_field(
        &self,
        group_id: &str,
        instance_id: InstanceId,
        field_code: &str,
        value: Value,
    ) -> Self {
        let mut next = self.clone();
        let target = next
            .repeatable_groups
            .get_mut(group_id)
            .and_then(|instances| instances.iter_mut().find(|i| i.id == instance_id));
        match target {
            Some(instance) => {
                instance.data.insert(field_code.to_string(), value);
            }
            None => warn!(group_id, %instance_id, "ignoring set on an unknown group instance"),
        }
        next
    }
}
