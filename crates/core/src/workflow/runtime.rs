//! Workflow runtime: the authoritative status/position state machine.
//!
//! Transitions are pure functions over the node list and current state; the
//! API layer persists the returned [`Transition`] and then re-reads the full
//! entry, so the stored state is always server-computed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

use super::node::{NodeType, ProcessNode};

/// Overall status of a persisted workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    Rejected,
    Completed,
    PermanentlyRejected,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Rejected => "rejected",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::PermanentlyRejected => "permanently_rejected",
        }
    }

    pub fn parse(s: &str) -> Option<WorkflowStatus> {
        match s {
            "pending" => Some(WorkflowStatus::Pending),
            "rejected" => Some(WorkflowStatus::Rejected),
            "completed" => Some(WorkflowStatus::Completed),
            "permanently_rejected" => Some(WorkflowStatus::PermanentlyRejected),
            _ => None,
        }
    }

    /// Terminal statuses accept no further actions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::Completed | WorkflowStatus::PermanentlyRejected
        )
    }
}

/// An action requested against the node at `current_node_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Approve,
    Reject,
    Back,
}

impl WorkflowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::Approve => "approve",
            WorkflowAction::Reject => "reject",
            WorkflowAction::Back => "back",
        }
    }

    /// Reject and send-back must carry a free-text comment.
    pub fn requires_comment(&self) -> bool {
        matches!(self, WorkflowAction::Reject | WorkflowAction::Back)
    }
}

/// Result of applying an action: the new status and node position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: WorkflowStatus,
    pub current_node_index: i32,
}

/// First position an executor can act on: the step right after `start`.
const FIRST_ACTIONABLE_INDEX: i32 = 1;

/// Apply `action` to a workflow positioned at `current_node_index`.
///
/// - `Approve` advances to the next node; landing on `end` completes the
///   workflow. Approving a `Rejected` workflow resumes it (resubmission).
/// - `Reject` marks the workflow `Rejected` in place; rejecting again
///   escalates to `PermanentlyRejected`.
/// - `Back` moves one step toward `start` and resets the status to
///   `Pending`. Sending back from the first step is a validation error.
///
/// Terminal statuses refuse every action with a conflict error. The returned
/// index always addresses a valid position in `nodes`.
pub fn apply_action(
    nodes: &[ProcessNode],
    status: WorkflowStatus,
    current_node_index: i32,
    action: WorkflowAction,
) -> Result<Transition, CoreError> {
    if status.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Workflow is {} and accepts no further actions",
            status.as_str()
        )));
    }

    let idx = usize::try_from(current_node_index)
        .ok()
        .filter(|i| *i < nodes.len())
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "current_node_index {current_node_index} out of range for {} nodes",
                nodes.len()
            ))
        })?;

    match action {
        WorkflowAction::Approve => {
            let next = idx + 1;
            let next_node = nodes.get(next).ok_or_else(|| {
                CoreError::Internal("Active node has no successor".into())
            })?;
            if next_node.node_type == NodeType::End {
                Ok(Transition {
                    status: WorkflowStatus::Completed,
                    current_node_index: next as i32,
                })
            } else {
                Ok(Transition {
                    status: WorkflowStatus::Pending,
                    current_node_index: next as i32,
                })
            }
        }
        WorkflowAction::Reject => {
            let status = if status == WorkflowStatus::Rejected {
                WorkflowStatus::PermanentlyRejected
            } else {
                WorkflowStatus::Rejected
            };
            Ok(Transition {
                status,
                current_node_index,
            })
        }
        WorkflowAction::Back => {
            if current_node_index <= FIRST_ACTIONABLE_INDEX {
                return Err(CoreError::Validation(
                    "Cannot send back from the first approval step".into(),
                ));
            }
            Ok(Transition {
                status: WorkflowStatus::Pending,
                current_node_index: current_node_index - 1,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::ProcessNode;
    use assert_matches::assert_matches;

    fn chain(steps: usize) -> Vec<ProcessNode> {
        let mut nodes = vec![ProcessNode::start()];
        for i in 0..steps {
            nodes.push(ProcessNode::step(format!("node{}", i + 1), "Step"));
        }
        nodes.push(ProcessNode::end());
        nodes
    }

    #[test]
    fn test_approve_advances_to_next_step() {
        let nodes = chain(2);
        let t = apply_action(&nodes, WorkflowStatus::Pending, 1, WorkflowAction::Approve)
            .unwrap();
        assert_eq!(t.status, WorkflowStatus::Pending);
        assert_eq!(t.current_node_index, 2);
    }

    #[test]
    fn test_approve_on_last_step_completes() {
        let nodes = chain(2);
        let t = apply_action(&nodes, WorkflowStatus::Pending, 2, WorkflowAction::Approve)
            .unwrap();
        assert_eq!(t.status, WorkflowStatus::Completed);
        assert_eq!(t.current_node_index, 3);
    }

    #[test]
    fn test_approve_resumes_rejected_workflow() {
        let nodes = chain(2);
        let t = apply_action(&nodes, WorkflowStatus::Rejected, 1, WorkflowAction::Approve)
            .unwrap();
        assert_eq!(t.status, WorkflowStatus::Pending);
        assert_eq!(t.current_node_index, 2);
    }

    #[test]
    fn test_reject_keeps_position() {
        let nodes = chain(2);
        let t = apply_action(&nodes, WorkflowStatus::Pending, 2, WorkflowAction::Reject)
            .unwrap();
        assert_eq!(t.status, WorkflowStatus::Rejected);
        assert_eq!(t.current_node_index, 2);
    }

    #[test]
    fn test_double_reject_escalates_to_permanent() {
        let nodes = chain(1);
        let t = apply_action(&nodes, WorkflowStatus::Rejected, 1, WorkflowAction::Reject)
            .unwrap();
        assert_eq!(t.status, WorkflowStatus::PermanentlyRejected);
    }

    #[test]
    fn test_back_moves_toward_start_and_resets_status() {
        let nodes = chain(3);
        let t = apply_action(&nodes, WorkflowStatus::Rejected, 3, WorkflowAction::Back)
            .unwrap();
        assert_eq!(t.status, WorkflowStatus::Pending);
        assert_eq!(t.current_node_index, 2);
    }

    #[test]
    fn test_back_from_first_step_is_refused() {
        let nodes = chain(2);
        let result = apply_action(&nodes, WorkflowStatus::Pending, 1, WorkflowAction::Back);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_terminal_statuses_refuse_all_actions() {
        let nodes = chain(2);
        for status in [
            WorkflowStatus::Completed,
            WorkflowStatus::PermanentlyRejected,
        ] {
            for action in [
                WorkflowAction::Approve,
                WorkflowAction::Reject,
                WorkflowAction::Back,
            ] {
                let result = apply_action(&nodes, status, 1, action);
                assert_matches!(result, Err(CoreError::Conflict(_)));
            }
        }
    }

    #[test]
    fn test_out_of_range_index_is_an_internal_error() {
        let nodes = chain(1);
        let result = apply_action(&nodes, WorkflowStatus::Pending, 9, WorkflowAction::Approve);
        assert_matches!(result, Err(CoreError::Internal(_)));
    }

    #[test]
    fn test_comment_requirement_per_action() {
        assert!(!WorkflowAction::Approve.requires_comment());
        assert!(WorkflowAction::Reject.requires_comment());
        assert!(WorkflowAction::Back.requires_comment());
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            WorkflowStatus::Pending,
            WorkflowStatus::Rejected,
            WorkflowStatus::Completed,
            WorkflowStatus::PermanentlyRejected,
        ] {
            assert_eq!(WorkflowStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(WorkflowStatus::parse("archived"), None);
    }
}
