//! Interactive classification workflow.
//!
//! The presentation layer (terminal menus and dialogs) lives elsewhere
//! and drives this module through [`DecisionPrompter`]; the workflow
//! owns the authoritative state transitions against the catalog.

mod types;
mod workflow;

pub use types::{
    CategoryDecision, ClassifyError, DecisionPrompter, ItemDecision, TriageSummary,
};
pub use workflow::ClassificationWorkflow;
