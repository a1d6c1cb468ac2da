//! Permission rules for acting on a workflow.
//!
//! These predicates are the single authority: the API layer evaluates them
//! before applying any action or form edit. The node consulted is always the
//! one at `current_node_index`.

use crate::roles::ROLE_ADMIN;
use crate::types::DbId;
use crate::workflow::{ProcessNode, WorkflowStatus};

/// The authenticated user attempting an operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub user_id: DbId,
    pub role: &'a str,
}

impl Actor<'_> {
    fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    fn is_executor_of(&self, node: &ProcessNode) -> bool {
        node.executor_id == Some(self.user_id)
    }
}

/// May `actor` dispatch an approve/reject/back action?
///
/// - Terminal statuses refuse everyone, including admins.
/// - Admins may act at any non-terminal state.
/// - The executor bound to the active node may act while the status is
///   `Pending`, or `Rejected` at that same node (resubmission path).
pub fn may_dispatch_action(
    actor: Actor<'_>,
    status: WorkflowStatus,
    active_node: &ProcessNode,
) -> bool {
    if status.is_terminal() {
        return false;
    }
    if actor.is_admin() {
        return true;
    }
    actor.is_executor_of(active_node)
        && matches!(status, WorkflowStatus::Pending | WorkflowStatus::Rejected)
}

/// May `actor` modify the form data associated with the workflow?
///
/// Same admin/executor rules as [`may_dispatch_action`]; additionally a CC
/// recipient of the active node may edit while the status is `Pending`,
/// provided that node grants edit access.
pub fn may_edit_form(
    actor: Actor<'_>,
    status: WorkflowStatus,
    active_node: &ProcessNode,
    edit_access: bool,
) -> bool {
    if status.is_terminal() {
        return false;
    }
    if actor.is_admin() {
        return true;
    }
    if actor.is_executor_of(active_node)
        && matches!(status, WorkflowStatus::Pending | WorkflowStatus::Rejected)
    {
        return true;
    }
    status == WorkflowStatus::Pending && edit_access && active_node.has_cc(actor.user_id)
}
