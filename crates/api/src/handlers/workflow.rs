//! Shared approval-workflow plumbing used by both resource kinds.
//!
//! Form templates and safety entries carry the same node-chain model; this
//! module owns the logic they share -- validating and packaging a submitted
//! node list into a persisted instance, and assembling the full workflow
//! view (nodes, CC assignments, status, comment trail) for responses.

use serde::Serialize;
use siteform_core::error::CoreError;
use siteform_core::types::DbId;
use siteform_core::workflow::{
    pack_for_submission, validate_nodes, ProcessNode, WorkflowStatus,
};
use siteform_db::models::workflow::{Workflow, WorkflowComment, WorkflowNode};
use siteform_db::repositories::WorkflowRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// A node row together with its CC assignments, as returned to clients.
#[derive(Debug, Serialize)]
pub struct NodeView {
    #[serde(flatten)]
    pub node: WorkflowNode,
    pub cc_recipients: Vec<CcView>,
}

/// A CC assignment as returned to clients.
#[derive(Debug, Serialize)]
pub struct CcView {
    pub user_id: DbId,
    pub user_name: String,
}

/// The full server-computed view of a workflow instance.
#[derive(Debug, Serialize)]
pub struct WorkflowView {
    pub id: DbId,
    pub status: String,
    pub current_node_index: i32,
    pub nodes: Vec<NodeView>,
    pub comments: Vec<WorkflowComment>,
}

/// Validate, package, and persist a submitted node list as a new workflow
/// instance of the given kind.
pub async fn create_instance(
    pool: &PgPool,
    kind: &str,
    created_by: DbId,
    nodes: &[ProcessNode],
) -> AppResult<Workflow> {
    validate_nodes(nodes).map_err(AppError::Core)?;
    let packed = pack_for_submission(nodes);
    let workflow = WorkflowRepo::create_with_nodes(pool, kind, created_by, &packed).await?;

    tracing::info!(
        workflow_id = workflow.id,
        kind = kind,
        node_count = packed.len(),
        "Workflow instance created"
    );
    Ok(workflow)
}

/// Everything the runtime and permission rules need about one instance.
pub struct WorkflowContext {
    pub workflow: Workflow,
    pub status: WorkflowStatus,
    /// In-memory node shapes in chain order.
    pub process_nodes: Vec<ProcessNode>,
    /// Raw node rows in chain order (same indices as `process_nodes`).
    pub node_rows: Vec<WorkflowNode>,
}

impl WorkflowContext {
    /// The node addressed by `current_node_index`.
    pub fn active_node(&self) -> AppResult<&ProcessNode> {
        usize::try_from(self.workflow.current_node_index)
            .ok()
            .and_then(|i| self.process_nodes.get(i))
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Workflow {} index {} addresses no node",
                    self.workflow.id, self.workflow.current_node_index
                ))
            })
    }

    /// Edit-access flag of the active node row.
    pub fn active_edit_access(&self) -> AppResult<bool> {
        usize::try_from(self.workflow.current_node_index)
            .ok()
            .and_then(|i| self.node_rows.get(i))
            .map(|row| row.edit_access)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Workflow {} index {} addresses no node",
                    self.workflow.id, self.workflow.current_node_index
                ))
            })
    }
}

/// Load a workflow instance with its nodes rebuilt for the runtime.
pub async fn load_context(pool: &PgPool, workflow_id: DbId) -> AppResult<WorkflowContext> {
    let workflow = WorkflowRepo::find_by_id(pool, workflow_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id: workflow_id,
        }))?;

    let status = WorkflowStatus::parse(&workflow.status).ok_or_else(|| {
        AppError::Internal(format!(
            "Workflow {} has unrecognized status '{}'",
            workflow.id, workflow.status
        ))
    })?;

    let node_rows = WorkflowRepo::list_nodes(pool, workflow_id).await?;
    let ccs = WorkflowRepo::list_cc_assignments(pool, workflow_id).await?;
    let process_nodes = node_rows.iter().map(|row| row.to_process_node(&ccs)).collect();

    Ok(WorkflowContext {
        workflow,
        status,
        process_nodes,
        node_rows,
    })
}

/// Assemble the client-facing view of an instance: nodes with their CC
/// lists, plus the comment trail.
pub async fn load_view(pool: &PgPool, workflow_id: DbId) -> AppResult<WorkflowView> {
    let workflow = WorkflowRepo::find_by_id(pool, workflow_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id: workflow_id,
        }))?;

    let node_rows = WorkflowRepo::list_nodes(pool, workflow_id).await?;
    let ccs = WorkflowRepo::list_cc_assignments(pool, workflow_id).await?;
    let comments = WorkflowRepo::list_comments(pool, workflow_id).await?;

    let nodes = node_rows
        .into_iter()
        .map(|node| {
            let cc_recipients = ccs
                .iter()
                .filter(|cc| cc.workflow_node_id == node.id)
                .map(|cc| CcView {
                    user_id: cc.user_id,
                    user_name: cc.user_name.clone(),
                })
                .collect();
            NodeView {
                node,
                cc_recipients,
            }
        })
        .collect();

    Ok(WorkflowView {
        id: workflow.id,
        status: workflow.status,
        current_node_index: workflow.current_node_index,
        nodes,
        comments,
    })
}
