//! Orchestrates one resolution cycle: resolve -> decide -> fetch -> compose.

use crate::layout::{compose, PaneFields};
use crate::metadata::FieldMetadataRepository;
use crate::state::DynamicFormState;
use crate::store::{FieldMetadataStore, TemplateStore};
use crate::workflow::{decide, RenderDecision, RenderMode, TemplateKey, TemplateResolver};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// The inputs identifying one screen mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenInputs {
    pub product_code: String,
    pub event_code: String,
    pub trigger_type: String,
    pub target_stage: Option<String>,
    pub pane_code: Option<String>,
}

impl ScreenInputs {
    pub fn new(
        product_code: impl Into<String>,
        event_code: impl Into<String>,
        trigger_type: impl Into<String>,
    ) -> Self {
        Self {
            product_code: product_code.into(),
            event_code: event_code.into(),
            trigger_type: trigger_type.into(),
            target_stage: None,
            pane_code: None,
        }
    }

    /// Targets a named stage instead of the first-stage default.
    pub fn with_target_stage(mut self, stage: impl Into<String>) -> Self {
        self.target_stage = Some(stage.into());
        self
    }

    /// Restricts the metadata fetch to one pane.
    pub fn with_pane(mut self, pane_code: impl Into<String>) -> Self {
        self.pane_code = Some(pane_code.into());
        self
    }

    fn template_key(&self) -> TemplateKey {
        TemplateKey::new(
            self.product_code.clone(),
            self.event_code.clone(),
            self.trigger_type.clone(),
        )
    }
}

/// A fully resolved screen: the render-mode decision plus, for dynamic stages,
/// the composed layout and a fresh form state. Static and no-template screens
/// carry an empty layout and state.
#[derive(Debug, Clone)]
pub struct ScreenResolution {
    pub decision: RenderDecision,
    pub panes: Vec<PaneFields>,
    pub state: DynamicFormState,
}

/// Runs resolution cycles and enforces "last input wins": each cycle carries a
/// monotonically increasing token, and a cycle whose token has been superseded
/// discards its results instead of applying stale configuration.
pub struct FormEngine<T, F> {
    resolver: TemplateResolver<T>,
    metadata: FieldMetadataRepository<F>,
    cycle: AtomicU64,
}

impl<T: TemplateStore, F: FieldMetadataStore> FormEngine<T, F> {
    pub fn new(resolver: TemplateResolver<T>, metadata: FieldMetadataRepository<F>) -> Self {
        Self {
            resolver,
            metadata,
            cycle: AtomicU64::new(0),
        }
    }

    /// Resolves the screen for the given inputs.
    ///
    /// Clears the template cache first so administrator edits between
    /// navigations are observed. Returns `None` only when a newer cycle
    /// started while this one was awaiting the store; the newest cycle always
    /// completes. No retries: a failed fetch surfaces as `has_template=false`
    /// and the caller may re-trigger.
    pub async fn resolve_screen(&self, inputs: &ScreenInputs) -> Option<ScreenResolution> {
        let token = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        self.resolver.clear_cache();

        let template = self.resolver.resolve(&inputs.template_key()).await;
        if self.superseded(token) {
            return None;
        }

        let decision = decide(template.as_ref(), inputs.target_stage.as_deref());
        if decision.render_mode != Some(RenderMode::Dynamic) {
            return Some(ScreenResolution {
                decision,
                panes: Vec::new(),
                state: DynamicFormState::new(),
            });
        }

        let fields = self
            .metadata
            .fetch(
                &inputs.product_code,
                &inputs.event_code,
                inputs.pane_code.as_deref(),
            )
            .await;
        if self.superseded(token) {
            return None;
        }

        let panes = compose(&fields);
        let state = DynamicFormState::for_layout(&panes);
        Some(ScreenResolution {
            decision,
            panes,
            state,
        })
    }

    fn superseded(&self, token: u64) -> bool {
        let current = self.cycle.load(Ordering::SeqCst);
        if current != token {
            debug!(token, current, "discarding superseded resolution cycle");
            return true;
        }
        false
    }
}
