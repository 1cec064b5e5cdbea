use super::{GridExtent, GroupedFields, PaneFields, SectionFields};
use crate::metadata::FieldDefinition;
use ahash::AHashMap;
use itertools::Itertools;
use std::hash::Hash;

/// Transforms a flat field-definition list into the Pane -> Section -> Group
/// tree a dynamic screen renders from.
///
/// Pure function of the input list: no network or state access, and the same
/// input always yields an identical tree. Panes and sections appear in
/// first-seen order; within a group, fields are ordered by display sequence
/// with (row, column, field code) as the deterministic tie-break.
pub fn compose(fields: &[FieldDefinition]) -> Vec<PaneFields> {
    partition_by(fields.iter(), |field| field.pane_code.clone())
        .into_iter()
        .map(|(pane_code, pane_members)| compose_pane(pane_code, &pane_members))
        .collect()
}

fn compose_pane(pane_code: String, members: &[&FieldDefinition]) -> PaneFields {
    let mut extent = GridExtent::default();
    let sections: Vec<SectionFields> =
        partition_by(members.iter().copied(), |field| field.section_code.clone())
            .into_iter()
            .map(|(section_code, section_members)| compose_section(section_code, &section_members))
            .collect();
    for section in &sections {
        extent.merge(section.extent);
    }

    PaneFields {
        pane_code,
        sections,
        extent,
    }
}

fn compose_section(section_code: String, members: &[&FieldDefinition]) -> SectionFields {
    // Fields sharing a group id merge into one group; ungrouped fields each
    // stay their own singleton group.
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<GroupedFields> = Vec::new();

    for field in members.iter().copied() {
        match field.grouping.group_id() {
            Some(group_id) => match index.get(group_id) {
                Some(&at) => {
                    groups[at].repeatable |= field.grouping.is_repeatable();
                    groups[at].fields.push(field.clone());
                }
                None => {
                    index.insert(group_id, groups.len());
                    groups.push(GroupedFields {
                        group_id: Some(group_id.to_string()),
                        repeatable: field.grouping.is_repeatable(),
                        fields: vec![field.clone()],
                        extent: GridExtent::default(),
                    });
                }
            },
            None => groups.push(GroupedFields {
                group_id: None,
                repeatable: false,
                fields: vec![field.clone()],
                extent: GridExtent::default(),
            }),
        }
    }

    let mut extent = GridExtent::default();
    for group in &mut groups {
        let ordered: Vec<FieldDefinition> = group
            .fields
            .drain(..)
            .sorted_by_key(|f| (f.display_sequence, f.row, f.column, f.field_code.clone()))
            .collect();
        group.fields = ordered;
        for field in &group.fields {
            group.extent.expand_for(field);
        }
        extent.merge(group.extent);
    }

    SectionFields {
        section_code,
        groups,
        extent,
    }
}

/// Partitions preserving the first-seen order of keys.
fn partition_by<'a, K, I, F>(fields: I, key: F) -> Vec<(K, Vec<&'a FieldDefinition>)>
where
    K: Eq + Hash + Clone,
    I: Iterator<Item = &'a FieldDefinition>,
    F: Fn(&FieldDefinition) -> K,
{
    let mut index: AHashMap<K, usize> = AHashMap::new();
    let mut out: Vec<(K, Vec<&'a FieldDefinition>)> = Vec::new();
    for field in fields {
        let k = key(field);
        match index.get(&k) {
            Some(&at) => out[at].1.push(field),
            None => {
                index.insert(k.clone(), out.len());
                out.push((k, vec![field]));
            }
        }
    }
    out
}
