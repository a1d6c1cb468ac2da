//! Approval workflow model.
//!
//! A workflow is an ordered list of [`ProcessNode`]s (one `start`, any number
//! of intermediate steps, one `end`) plus a current-position pointer and an
//! overall status. The same model backs both resource kinds that carry an
//! approval chain (form templates and safety entries), so the editor,
//! packaging, and runtime logic live here once instead of per resource.

pub mod editor;
pub mod node;
pub mod runtime;
pub mod submit;

pub use editor::WorkflowDraft;
pub use node::{CcRecipient, Expiry, NodeType, ProcessNode};
pub use runtime::{apply_action, Transition, WorkflowAction, WorkflowStatus};
pub use submit::{pack_for_submission, validate_nodes, SubmittedNode};
