//! Node-list validation and submission packaging.
//!
//! Packaging normalizes the optional editor fields into the concrete shape
//! persisted with a workflow: a CC list that was never touched becomes `[]`,
//! and an edit-access flag that was never set becomes `true`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

use super::node::{CcRecipient, Expiry, NodeType, ProcessNode};

/// A node as persisted with a workflow instance: all defaults resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub executor_id: Option<DbId>,
    pub executor_name: Option<String>,
    pub cc_recipients: Vec<CcRecipient>,
    pub edit_access: bool,
    pub expire_time: Option<Expiry>,
    pub expire_duration: Option<i64>,
}

/// Resolve editor defaults across a node list.
///
/// `cc_recipients` defaults to `[]`; `edit_access` defaults to `true` for
/// anything that is not explicitly `false`. `executor_name` is a copy of the
/// editor's display-name field.
pub fn pack_for_submission(nodes: &[ProcessNode]) -> Vec<SubmittedNode> {
    nodes
        .iter()
        .map(|node| SubmittedNode {
            id: node.id.clone(),
            node_type: node.node_type,
            name: node.name.clone(),
            executor_id: node.executor_id,
            executor_name: node.executor.clone(),
            cc_recipients: node.cc_recipients.clone().unwrap_or_default(),
            edit_access: node.edit_access != Some(false),
            expire_time: node.expire_time,
            expire_duration: node.expire_duration,
        })
        .collect()
}

/// Validate the structural invariants of a node list before persisting it.
///
/// - exactly one `start` node, in first position
/// - exactly one `end` node, in last position
/// - at least one intermediate approval step
/// - node ids unique within the list
/// - no duplicate user ids within any node's CC list
pub fn validate_nodes(nodes: &[ProcessNode]) -> Result<(), CoreError> {
    let starts = nodes
        .iter()
        .filter(|n| n.node_type == NodeType::Start)
        .count();
    let ends = nodes.iter().filter(|n| n.node_type == NodeType::End).count();
    if starts != 1 || ends != 1 {
        return Err(CoreError::Validation(format!(
            "Workflow must contain exactly one start and one end node (got {starts} start, {ends} end)"
        )));
    }
    if nodes.first().map(|n| n.node_type) != Some(NodeType::Start) {
        return Err(CoreError::Validation(
            "Workflow must begin with the start node".into(),
        ));
    }
    if nodes.last().map(|n| n.node_type) != Some(NodeType::End) {
        return Err(CoreError::Validation(
            "Workflow must terminate with the end node".into(),
        ));
    }
    // A bare start/end pair would leave the runtime with no actionable
    // step and no executor who could ever advance it.
    if !nodes.iter().any(|n| n.node_type == NodeType::Step) {
        return Err(CoreError::Validation(
            "Workflow must contain at least one approval step".into(),
        ));
    }

    for (i, node) in nodes.iter().enumerate() {
        if nodes[..i].iter().any(|prev| prev.id == node.id) {
            return Err(CoreError::Validation(format!(
                "Duplicate node id '{}'",
                node.id
            )));
        }
        if let Some(ccs) = node.cc_recipients.as_ref() {
            for (j, cc) in ccs.iter().enumerate() {
                if ccs[..j].iter().any(|prev| prev.id == cc.id) {
                    return Err(CoreError::Validation(format!(
                        "Node '{}' lists CC recipient {} more than once",
                        node.id, cc.id
                    )));
                }
            }
        }
    }

    Ok(())
}
