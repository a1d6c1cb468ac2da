//! Repository for the `workflows`, `workflow_nodes`, `workflow_cc_recipients`,
//! and `workflow_comments` tables.

use siteform_core::types::DbId;
use siteform_core::workflow::{Expiry, SubmittedNode, WorkflowStatus};
use sqlx::PgPool;

use crate::models::workflow::{
    CcAssignment, CreateComment, Workflow, WorkflowComment, WorkflowNode,
};

/// Column list for workflows queries.
const WORKFLOW_COLUMNS: &str =
    "id, kind, status, current_node_index, created_by, created_at, updated_at";

/// Column list for workflow_nodes queries.
const NODE_COLUMNS: &str = "id, workflow_id, position, node_key, node_type, name, \
    executor_id, executor_name, edit_access, expires_at, expire_duration_hours";

/// First actionable position: the step right after `start`.
const INITIAL_NODE_INDEX: i32 = 1;

/// Provides persistence for workflow instances and their audit trail.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Create a workflow instance together with its node rows and CC
    /// assignments, atomically. The instance starts `pending` with the
    /// index on the first approval step.
    pub async fn create_with_nodes(
        pool: &PgPool,
        kind: &str,
        created_by: DbId,
        nodes: &[SubmittedNode],
    ) -> Result<Workflow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO workflows (kind, status, current_node_index, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {WORKFLOW_COLUMNS}"
        );
        let workflow = sqlx::query_as::<_, Workflow>(&query)
            .bind(kind)
            .bind(WorkflowStatus::Pending.as_str())
            .bind(INITIAL_NODE_INDEX)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        for (position, node) in nodes.iter().enumerate() {
            let expires_at = match node.expire_time {
                Some(Expiry::At(ts)) => Some(ts),
                // "unlimited" and unset both mean no deadline.
                Some(Expiry::Unlimited) | None => None,
            };

            let node_id = sqlx::query_scalar::<_, DbId>(
                "INSERT INTO workflow_nodes
                    (workflow_id, position, node_key, node_type, name,
                     executor_id, executor_name, edit_access, expires_at,
                     expire_duration_hours)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                 RETURNING id",
            )
            .bind(workflow.id)
            .bind(position as i32)
            .bind(&node.id)
            .bind(node.node_type.as_str())
            .bind(&node.name)
            .bind(node.executor_id)
            .bind(&node.executor_name)
            .bind(node.edit_access)
            .bind(expires_at)
            .bind(node.expire_duration)
            .fetch_one(&mut *tx)
            .await?;

            for cc in &node.cc_recipients {
                sqlx::query(
                    "INSERT INTO workflow_cc_recipients
                        (workflow_node_id, user_id, user_name)
                     VALUES ($1, $2, $3)",
                )
                .bind(node_id)
                .bind(cc.id)
                .bind(&cc.name)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(workflow)
    }

    /// Find a workflow instance by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workflow>, sqlx::Error> {
        let query = format!("SELECT {WORKFLOW_COLUMNS} FROM workflows WHERE id = $1");
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the node rows of a workflow in chain order.
    pub async fn list_nodes(
        pool: &PgPool,
        workflow_id: DbId,
    ) -> Result<Vec<WorkflowNode>, sqlx::Error> {
        let query = format!(
            "SELECT {NODE_COLUMNS} FROM workflow_nodes
             WHERE workflow_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, WorkflowNode>(&query)
            .bind(workflow_id)
            .fetch_all(pool)
            .await
    }

    /// List every CC assignment across a workflow's nodes.
    pub async fn list_cc_assignments(
        pool: &PgPool,
        workflow_id: DbId,
    ) -> Result<Vec<CcAssignment>, sqlx::Error> {
        sqlx::query_as::<_, CcAssignment>(
            "SELECT cc.id, cc.workflow_node_id, cc.user_id, cc.user_name
             FROM workflow_cc_recipients cc
             JOIN workflow_nodes n ON n.id = cc.workflow_node_id
             WHERE n.workflow_id = $1
             ORDER BY cc.id ASC",
        )
        .bind(workflow_id)
        .fetch_all(pool)
        .await
    }

    /// Persist a runtime transition together with its audit-trail comment,
    /// atomically: the state never advances without the comment landing.
    /// Fails with `RowNotFound` when the workflow row no longer exists.
    pub async fn record_action(
        pool: &PgPool,
        workflow_id: DbId,
        status: WorkflowStatus,
        current_node_index: i32,
        comment: &CreateComment,
    ) -> Result<Workflow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE workflows
             SET status = $2, current_node_index = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {WORKFLOW_COLUMNS}"
        );
        let workflow = sqlx::query_as::<_, Workflow>(&query)
            .bind(workflow_id)
            .bind(status.as_str())
            .bind(current_node_index)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query(
            "INSERT INTO workflow_comments (workflow_id, user_id, action, comment)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(comment.workflow_id)
        .bind(comment.user_id)
        .bind(&comment.action)
        .bind(&comment.comment)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(workflow)
    }

    /// List a workflow's comments with author display names, oldest first.
    pub async fn list_comments(
        pool: &PgPool,
        workflow_id: DbId,
    ) -> Result<Vec<WorkflowComment>, sqlx::Error> {
        sqlx::query_as::<_, WorkflowComment>(
            "SELECT c.id, c.workflow_id, c.user_id, u.display_name AS user_name,
                    c.action, c.comment, c.created_at
             FROM workflow_comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.workflow_id = $1
             ORDER BY c.created_at ASC",
        )
        .bind(workflow_id)
        .fetch_all(pool)
        .await
    }
}
