//! In-memory node-list editor used while composing a workflow.
//!
//! All mutations match a node by `id` and leave list order untouched; only
//! [`WorkflowDraft::add_step`] changes order, and it always inserts
//! immediately before the single `end` node.

use crate::types::DbId;

use super::node::{CcRecipient, Expiry, NodeType, ProcessNode};

/// Ordered node list plus the id of the node shown in the settings panel.
#[derive(Debug, Clone)]
pub struct WorkflowDraft {
    nodes: Vec<ProcessNode>,
    selected: Option<String>,
}

impl WorkflowDraft {
    /// Seed a draft with the three initial nodes: `start`, one default
    /// approval step, `end`. The default step starts selected.
    pub fn new() -> Self {
        let first = ProcessNode::step("node1", "Approval step");
        let selected = Some(first.id.clone());
        WorkflowDraft {
            nodes: vec![ProcessNode::start(), first, ProcessNode::end()],
            selected,
        }
    }

    /// Build a draft from an existing node list, e.g. when re-editing a
    /// template. Nothing is selected initially.
    pub fn from_nodes(nodes: Vec<ProcessNode>) -> Self {
        WorkflowDraft {
            nodes,
            selected: None,
        }
    }

    pub fn nodes(&self) -> &[ProcessNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<ProcessNode> {
        self.nodes
    }

    /// Id of the currently selected node, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Move the selection pointer. Purely a UI pointer: no model change.
    /// Returns `false` when no node has the given id.
    pub fn select(&mut self, id: &str) -> bool {
        if self.nodes.iter().any(|n| n.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Insert a fresh approval step immediately before the `end` node and
    /// select it. Returns the new node's id, or `None` when the list has no
    /// `end` node (defensive guard: the list is left unchanged).
    pub fn add_step(&mut self) -> Option<String> {
        let end_pos = self
            .nodes
            .iter()
            .position(|n| n.node_type == NodeType::End)?;

        let id = self.next_step_id();
        let count = self
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Step)
            .count();
        let node = ProcessNode::step(&id, format!("Approval step {}", count + 1));
        self.nodes.insert(end_pos, node);
        self.selected = Some(id.clone());
        Some(id)
    }

    /// Replace the matched node's name; every other field is preserved.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        self.with_node(id, |node| node.name = name.to_string())
    }

    /// Bind the single responsible user to the matched node.
    pub fn set_executor(&mut self, id: &str, executor_id: DbId, executor_name: &str) -> bool {
        self.with_node(id, |node| {
            node.executor_id = Some(executor_id);
            node.executor = Some(executor_name.to_string());
        })
    }

    /// Append a CC recipient unless one with the same user id is already
    /// present. Adding twice is a no-op, so the CC list stays a set.
    pub fn add_cc(&mut self, id: &str, recipient: CcRecipient) -> bool {
        self.with_node(id, |node| {
            let ccs = node.cc_recipients.get_or_insert_with(Vec::new);
            if !ccs.iter().any(|cc| cc.id == recipient.id) {
                ccs.push(recipient);
            }
        })
    }

    /// Remove a CC recipient by user id.
    pub fn remove_cc(&mut self, id: &str, user_id: DbId) -> bool {
        self.with_node(id, |node| {
            if let Some(ccs) = node.cc_recipients.as_mut() {
                ccs.retain(|cc| cc.id != user_id);
            }
        })
    }

    /// Flip whether CC recipients may edit the form while the node is
    /// active. An unset flag counts as `true`, so the first toggle on a
    /// fresh node yields `false`.
    pub fn toggle_edit_access(&mut self, id: &str) -> bool {
        self.with_node(id, |node| {
            node.edit_access = Some(!node.edit_access.unwrap_or(true));
        })
    }

    /// Set the expiry to `unlimited` or an explicit instant. Either form
    /// clears the legacy hour-count field.
    pub fn set_expiry(&mut self, id: &str, expiry: Expiry) -> bool {
        self.with_node(id, |node| {
            node.expire_time = Some(expiry);
            node.expire_duration = None;
        })
    }

    /// Set the legacy hour-count expiry, clearing any explicit timestamp.
    pub fn set_expire_duration(&mut self, id: &str, hours: i64) -> bool {
        self.with_node(id, |node| {
            node.expire_duration = Some(hours);
            node.expire_time = None;
        })
    }

    /// Generate a step id that does not collide with any existing node.
    /// Prefers `node<N>`; falls back to a timestamp-based id.
    fn next_step_id(&self) -> String {
        let steps = self
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Step)
            .count();
        let candidate = format!("node{}", steps + 1);
        if !self.nodes.iter().any(|n| n.id == candidate) {
            return candidate;
        }
        format!("node_{}", chrono::Utc::now().timestamp_millis())
    }

    fn with_node(&mut self, id: &str, f: impl FnOnce(&mut ProcessNode)) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }
}

impl Default for WorkflowDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ids(draft: &WorkflowDraft) -> Vec<&str> {
        draft.nodes().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_new_draft_seeds_three_nodes() {
        let draft = WorkflowDraft::new();
        assert_eq!(ids(&draft), vec!["start", "node1", "end"]);
        assert_eq!(draft.selected_id(), Some("node1"));
    }

    #[test]
    fn test_add_step_inserts_before_end() {
        let mut draft = WorkflowDraft::new();
        let id = draft.add_step().expect("end node exists");
        assert_eq!(id, "node2");
        assert_eq!(ids(&draft), vec!["start", "node1", "node2", "end"]);

        let added = &draft.nodes()[2];
        assert_eq!(added.node_type, NodeType::Step);
        assert_eq!(added.edit_access, Some(true));
        assert!(added.executor.is_none());
        assert!(added.cc_recipients.is_none());
        assert_eq!(draft.selected_id(), Some("node2"));
    }

    #[test]
    fn test_add_step_preserves_prior_nodes() {
        let mut draft = WorkflowDraft::new();
        draft.rename("node1", "Foreman sign-off");
        draft.add_step();
        assert_eq!(draft.nodes()[1].name, "Foreman sign-off");
        assert_eq!(draft.nodes()[1].id, "node1");
    }

    #[test]
    fn test_add_step_without_end_is_a_noop() {
        let mut draft = WorkflowDraft::from_nodes(vec![
            ProcessNode::start(),
            ProcessNode::step("node1", "Review"),
        ]);
        assert_eq!(draft.add_step(), None);
        assert_eq!(ids(&draft), vec!["start", "node1"]);
    }

    #[test]
    fn test_add_step_on_empty_list_is_a_noop() {
        let mut draft = WorkflowDraft::from_nodes(vec![]);
        assert_eq!(draft.add_step(), None);
        assert!(draft.nodes().is_empty());
    }

    #[test]
    fn test_step_id_collision_falls_back_to_timestamp() {
        let mut draft = WorkflowDraft::from_nodes(vec![
            ProcessNode::start(),
            ProcessNode::step("node2", "Oddly named"),
            ProcessNode::end(),
        ]);
        let id = draft.add_step().unwrap();
        assert!(id.starts_with("node_"), "expected timestamp fallback, got {id}");
    }

    #[test]
    fn test_select_unknown_id_leaves_selection() {
        let mut draft = WorkflowDraft::new();
        assert!(!draft.select("ghost"));
        assert_eq!(draft.selected_id(), Some("node1"));
    }

    #[test]
    fn test_set_executor_touches_only_target_node() {
        let mut draft = WorkflowDraft::new();
        draft.add_step();
        assert!(draft.set_executor("node1", 42, "Alice"));
        assert_eq!(draft.nodes()[1].executor_id, Some(42));
        assert!(draft.nodes()[2].executor_id.is_none());
    }

    #[test]
    fn test_add_cc_is_idempotent() {
        let mut draft = WorkflowDraft::new();
        let bob = CcRecipient {
            id: 9,
            name: "Bob".into(),
        };
        assert!(draft.add_cc("node1", bob.clone()));
        assert!(draft.add_cc("node1", bob));
        let ccs = draft.nodes()[1].cc_recipients.as_ref().unwrap();
        assert_eq!(ccs.len(), 1);
        assert_eq!(ccs[0].id, 9);
    }

    #[test]
    fn test_remove_cc_by_id() {
        let mut draft = WorkflowDraft::new();
        draft.add_cc("node1", CcRecipient { id: 1, name: "A".into() });
        draft.add_cc("node1", CcRecipient { id: 2, name: "B".into() });
        draft.remove_cc("node1", 1);
        let ccs = draft.nodes()[1].cc_recipients.as_ref().unwrap();
        assert_eq!(ccs.len(), 1);
        assert_eq!(ccs[0].id, 2);
    }

    #[test]
    fn test_toggle_edit_access_twice_restores_value() {
        let mut draft = WorkflowDraft::new();
        let original = draft.nodes()[1].edit_access;
        draft.toggle_edit_access("node1");
        assert_ne!(draft.nodes()[1].edit_access, original);
        draft.toggle_edit_access("node1");
        assert_eq!(draft.nodes()[1].edit_access, original);
    }

    #[test]
    fn test_set_expiry_clears_legacy_duration() {
        let mut draft = WorkflowDraft::new();
        draft.set_expire_duration("node1", 48);
        assert_eq!(draft.nodes()[1].expire_duration, Some(48));

        let ts = Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap();
        draft.set_expiry("node1", Expiry::At(ts));
        let node = &draft.nodes()[1];
        assert_eq!(node.expire_time, Some(Expiry::At(ts)));
        assert_eq!(node.expire_duration, None);
    }

    #[test]
    fn test_set_duration_clears_explicit_expiry() {
        let mut draft = WorkflowDraft::new();
        draft.set_expiry("node1", Expiry::Unlimited);
        draft.set_expire_duration("node1", 24);
        let node = &draft.nodes()[1];
        assert_eq!(node.expire_time, None);
        assert_eq!(node.expire_duration, Some(24));
    }

    #[test]
    fn test_mutation_on_unknown_id_is_a_noop() {
        let mut draft = WorkflowDraft::new();
        assert!(!draft.rename("ghost", "x"));
        assert!(!draft.toggle_edit_access("ghost"));
        assert_eq!(ids(&draft), vec!["start", "node1", "end"]);
    }
}
