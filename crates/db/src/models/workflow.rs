//! Workflow instance, node, CC assignment, and comment models.
//!
//! One `workflows` row backs either resource kind (form template or safety
//! entry); the owning resource points at it via `workflow_id`.

use serde::{Deserialize, Serialize};
use siteform_core::types::{DbId, Timestamp};
use siteform_core::workflow::{CcRecipient, Expiry, NodeType, ProcessNode};
use sqlx::FromRow;

/// Resource kinds that carry an approval chain.
pub mod kinds {
    pub const FORM_TEMPLATE: &str = "form_template";
    pub const SAFETY: &str = "safety";
}

/// A row from the `workflows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workflow {
    pub id: DbId,
    /// One of [`kinds`].
    pub kind: String,
    /// Stored as text; parse with `WorkflowStatus::parse`.
    pub status: String,
    pub current_node_index: i32,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `workflow_nodes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowNode {
    pub id: DbId,
    pub workflow_id: DbId,
    /// Zero-based position within the chain; `current_node_index` points here.
    pub position: i32,
    /// Client-side node id, e.g. `start`, `node1`.
    pub node_key: String,
    /// One of `start`, `node`, `end`.
    pub node_type: String,
    pub name: String,
    pub executor_id: Option<DbId>,
    pub executor_name: Option<String>,
    pub edit_access: bool,
    /// `NULL` means unlimited.
    pub expires_at: Option<Timestamp>,
    /// Legacy hour-count expiry carried for old rows; an explicit
    /// `expires_at` wins when both are present.
    pub expire_duration_hours: Option<i64>,
}

impl WorkflowNode {
    /// Rebuild the in-memory node shape used by the runtime and permission
    /// rules, attaching this node's CC assignments.
    pub fn to_process_node(&self, ccs: &[CcAssignment]) -> ProcessNode {
        let cc_recipients: Vec<CcRecipient> = ccs
            .iter()
            .filter(|cc| cc.workflow_node_id == self.id)
            .map(|cc| CcRecipient {
                id: cc.user_id,
                name: cc.user_name.clone(),
            })
            .collect();

        let mut node = ProcessNode::step(&self.node_key, &self.name);
        node.node_type = NodeType::parse(&self.node_type).unwrap_or(NodeType::Step);
        node.executor_id = self.executor_id;
        node.executor = self.executor_name.clone();
        node.cc_recipients = Some(cc_recipients);
        node.edit_access = Some(self.edit_access);
        // The two expiry fields stay mutually exclusive: an explicit
        // timestamp wins, a legacy duration alone leaves expire_time unset,
        // and neither means unlimited.
        node.expire_time = match (self.expires_at, self.expire_duration_hours) {
            (Some(ts), _) => Some(Expiry::At(ts)),
            (None, Some(_)) => None,
            (None, None) => Some(Expiry::Unlimited),
        };
        node.expire_duration = if self.expires_at.is_some() {
            None
        } else {
            self.expire_duration_hours
        };
        node
    }
}

/// A row from the `workflow_cc_recipients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CcAssignment {
    pub id: DbId,
    pub workflow_node_id: DbId,
    pub user_id: DbId,
    /// Display name captured at assignment time.
    pub user_name: String,
}

/// A workflow comment joined with its author's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowComment {
    pub id: DbId,
    pub workflow_id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    /// The action that produced the comment: `approve`, `reject`, `back`.
    pub action: String,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending an audit-trail comment.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub workflow_id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn node_row() -> WorkflowNode {
        WorkflowNode {
            id: 10,
            workflow_id: 1,
            position: 1,
            node_key: "node1".into(),
            node_type: "node".into(),
            name: "Review".into(),
            executor_id: Some(2),
            executor_name: Some("Exec".into()),
            edit_access: true,
            expires_at: None,
            expire_duration_hours: None,
        }
    }

    #[test]
    fn test_rebuild_without_deadline_is_unlimited() {
        let node = node_row().to_process_node(&[]);
        assert_eq!(node.expire_time, Some(Expiry::Unlimited));
        assert_eq!(node.expire_duration, None);
    }

    #[test]
    fn test_rebuild_keeps_legacy_duration_exclusive() {
        let mut row = node_row();
        row.expire_duration_hours = Some(48);
        let node = row.to_process_node(&[]);
        assert_eq!(node.expire_time, None);
        assert_eq!(node.expire_duration, Some(48));
    }

    #[test]
    fn test_rebuild_prefers_explicit_timestamp_over_duration() {
        let ts = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let mut row = node_row();
        row.expires_at = Some(ts);
        row.expire_duration_hours = Some(48);
        let node = row.to_process_node(&[]);
        assert_eq!(node.expire_time, Some(Expiry::At(ts)));
        assert_eq!(node.expire_duration, None);
    }
}
