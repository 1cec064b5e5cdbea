//! Prelude module for convenient imports
//!
//! Re-exports the types and traits most hosting screens need: the engine, the
//! resolver/decider surface, the layout tree, form state, and rule flags.

// Orchestration
pub use crate::engine::{FormEngine, ScreenInputs, ScreenResolution};

// Workflow resolution
pub use crate::workflow::{
    decide, RenderDecision, RenderMode, TemplateCache, TemplateKey, TemplateResolver,
    WorkflowStage, WorkflowTemplate,
};

// Field metadata
pub use crate::metadata::{FieldDefinition, FieldMetadataRepository, Grouping};

// Layout composition
pub use crate::layout::{compose, GridExtent, GroupedFields, PaneFields, SectionFields};

// Form state
pub use crate::state::{DynamicFormState, InstanceId, RepeatableGroupInstance};

// Conditional rules
pub use crate::rule::{parse_rule, Channel, FieldFlags, RuleExpr, RuleKind, Value};

// Store traits
pub use crate::store::{FieldMetadataStore, TemplateStore};

// Error types
pub use crate::error::{EvaluationError, RuleParseError, StoreError};
