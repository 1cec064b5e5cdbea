//! # Kumiko - Workflow-Driven Dynamic Form Engine
//!
//! **Kumiko** decides, per product/event/trigger combination, whether a transaction
//! screen renders from hand-built panes ("static" mode) or is assembled entirely from
//! field metadata ("dynamic" mode), and performs the pane/section/group decomposition
//! and conditional-rule evaluation that dynamic mode requires.
//!
//! ## Core Workflow
//!
//! The engine is a library invoked by a hosting screen. One resolution cycle runs:
//!
//! 1.  **Resolve**: The [`workflow::TemplateResolver`] looks up the workflow template
//!     matching the (product, event, trigger) triple through a [`store::TemplateStore`],
//!     caching results in an explicit [`workflow::TemplateCache`].
//! 2.  **Decide**: [`workflow::decide`] picks the relevant stage and its render mode.
//!     Absent configuration degrades to the static screen, never to an error.
//! 3.  **Fetch + Compose**: For dynamic stages, the [`metadata::FieldMetadataRepository`]
//!     supplies active field definitions (with their conditional rules compiled once),
//!     and [`layout::compose`] builds the Pane -> Section -> Group tree.
//! 4.  **Interact**: A [`state::DynamicFormState`] holds live values as snapshots;
//!     [`rule::FieldFlags::evaluate`] recomputes visibility/mandatory flags on every
//!     state change, failing closed on broken expressions.
//!
//! The [`engine::FormEngine`] ties the cycle together and discards results from
//! superseded cycles, so "last input wins" when the hosting screen navigates quickly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kumiko::prelude::*;
//! use kumiko::error::StoreError;
//! use kumiko::metadata::FieldRecord;
//! use kumiko::workflow::TemplateRecord;
//! use async_trait::async_trait;
//!
//! // Adapters over your hosted backend implement the two store traits.
//! struct BackendTemplates;
//! struct BackendFields;
//!
//! #[async_trait]
//! impl TemplateStore for BackendTemplates {
//!     async fn find_template(
//!         &self,
//!         key: &TemplateKey,
//!     ) -> Result<Option<TemplateRecord>, StoreError> {
//!         // In a real implementation this queries the remote template store.
//!         Ok(None)
//!     }
//! }
//!
//! #[async_trait]
//! impl FieldMetadataStore for BackendFields {
//!     async fn find_fields(
//!         &self,
//!         product_code: &str,
//!         event_type: &str,
//!         pane_code: Option<&str>,
//!     ) -> Result<Vec<FieldRecord>, StoreError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! async fn mount_screen() {
//!     let resolver = TemplateResolver::new(BackendTemplates, TemplateCache::new());
//!     let repository = FieldMetadataRepository::new(BackendFields);
//!     let engine = FormEngine::new(resolver, repository);
//!
//!     let inputs = ScreenInputs::new("ILC", "ISSUE", "CLIENT_PORTAL");
//!     if let Some(screen) = engine.resolve_screen(&inputs).await {
//!         if screen.decision.render_mode == Some(RenderMode::Dynamic) {
//!             let flags = FieldFlags::evaluate(&screen.panes, &screen.state, Channel::Portal);
//!             println!("{} field(s) visible", flags.visible.values().filter(|v| **v).count());
//!         } else {
//!             println!("falling back to the static screen");
//!         }
//!     } else {
//!         println!("cycle superseded by newer inputs");
//!     }
//! }
//! ```

pub mod engine;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod prelude;
pub mod rule;
pub mod state;
pub mod store;
pub mod workflow;
