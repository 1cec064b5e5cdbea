use crate::metadata::FieldDefinition;

/// Grid extents of a group, section, or pane: the maximum of `row + row_span`
/// and `column + column_span` over the fields it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridExtent {
    pub rows: u32,
    pub columns: u32,
}

impl GridExtent {
    pub(super) fn expand_for(&mut self, field: &FieldDefinition) {
        // Spans come from the store unvalidated; saturate rather than overflow.
        self.rows = self.rows.max(field.row.saturating_add(field.row_span));
        self.columns = self
            .columns
            .max(field.column.saturating_add(field.column_span));
    }

    pub(super) fn merge(&mut self, other: GridExtent) {
        self.rows = self.rows.max(other.rows);
        self.columns = self.columns.max(other.columns);
    }
}

/// The repeatable or singleton unit of fields within a section.
///
/// `group_id` is `None` for the implicit group wrapped around a single
/// ungrouped field; such groups are never merged into a shared synthetic one.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedFields {
    pub group_id: Option<String>,
    pub repeatable: bool,
    pub fields: Vec<FieldDefinition>,
    pub extent: GridExtent,
}

/// Groups under one section heading, in first-seen source order.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFields {
    pub section_code: String,
    pub groups: Vec<GroupedFields>,
    pub extent: GridExtent,
}

/// A top-level screen division with its sections, in first-seen source order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneFields {
    pub pane_code: String,
    pub sections: Vec<SectionFields>,
    pub extent: GridExtent,
}

impl PaneFields {
    /// All field definitions in the pane, in layout order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> + '_ {
        self.sections
            .iter()
            .flat_map(|section| section.groups.iter())
            .flat_map(|group| group.fields.iter())
    }
}
