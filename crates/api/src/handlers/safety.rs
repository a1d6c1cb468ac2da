//! Handlers for the safety-entry resource and its workflow actions.
//!
//! A safety entry is a filled-in form plus a live workflow instance. Updates
//! arrive as a tagged union: either a form-data edit or a workflow action
//! (approve / reject / back). After any write the handler re-reads the full
//! entry and returns it, so clients always see server-computed state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use siteform_core::error::CoreError;
use siteform_core::permissions::{may_dispatch_action, may_edit_form};
use siteform_core::types::DbId;
use siteform_core::workflow::{apply_action, ProcessNode, WorkflowAction};
use siteform_db::models::safety::{CreateSafetyEntry, SafetyEntry};
use siteform_db::models::workflow::{kinds, CreateComment};
use siteform_db::repositories::{SafetyRepo, WorkflowRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::projects::ensure_project_exists;
use crate::handlers::workflow::{self, WorkflowView};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{project_id}/safety`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSafetyRequest {
    pub form_data: serde_json::Value,
    #[validate(length(min = 1, message = "Workflow must contain at least one node"))]
    pub process_nodes: Vec<ProcessNode>,
}

/// Request body for `PUT /safety/{id}`: either a form edit or a workflow
/// action. The two shapes are disjoint, so serde resolves the variant from
/// the fields present.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UpdateSafetyRequest {
    Action {
        action: WorkflowAction,
        #[serde(default)]
        comment: Option<String>,
    },
    FormUpdate {
        form_data: serde_json::Value,
    },
}

/// Full safety entry as returned by every read and write endpoint.
#[derive(Debug, Serialize)]
pub struct SafetyEntryView {
    #[serde(flatten)]
    pub entry: SafetyEntry,
    pub workflow: WorkflowView,
}

async fn load_entry_view(state: &AppState, id: DbId) -> AppResult<SafetyEntryView> {
    let entry = SafetyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SafetyEntry",
            id,
        }))?;
    let view = workflow::load_view(&state.pool, entry.workflow_id).await?;
    Ok(SafetyEntryView {
        entry,
        workflow: view,
    })
}

/// POST /api/v1/projects/{project_id}/safety
///
/// Create a safety entry together with its live workflow instance.
pub async fn create_safety_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateSafetyRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    ensure_project_exists(&state.pool, project_id).await?;

    let instance = workflow::create_instance(
        &state.pool,
        kinds::SAFETY,
        auth.user_id,
        &input.process_nodes,
    )
    .await?;

    let create = CreateSafetyEntry {
        project_id,
        workflow_id: instance.id,
        form_data: input.form_data,
        created_by: auth.user_id,
    };
    let entry = SafetyRepo::create(&state.pool, &create).await?;

    tracing::info!(
        user_id = auth.user_id,
        safety_id = entry.id,
        workflow_id = instance.id,
        "Safety entry created"
    );

    let view = load_entry_view(&state, entry.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/projects/{project_id}/safety
pub async fn list_safety_entries(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let entries = SafetyRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/safety/{id}
///
/// Full entry: form data, workflow nodes with CC assignments, status,
/// current node index, and comment history.
pub async fn get_safety_entry(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = load_entry_view(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/safety/{id}
///
/// Apply a form edit or a workflow action, then return the refreshed entry.
pub async fn update_safety_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSafetyRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = SafetyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SafetyEntry",
            id,
        }))?;

    match input {
        UpdateSafetyRequest::Action { action, comment } => {
            dispatch_action(&state, &auth, &entry, action, comment).await?;
        }
        UpdateSafetyRequest::FormUpdate { form_data } => {
            apply_form_update(&state, &auth, &entry, form_data).await?;
        }
    }

    // Read-after-write refresh: return the server-computed state rather
    // than predicting it.
    let view = load_entry_view(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/safety/{id}
///
/// Admin-only deletion.
pub async fn delete_safety_entry(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = SafetyRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SafetyEntry",
            id,
        }));
    }
    tracing::info!(user_id = admin.user_id, safety_id = id, "Safety entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Validate, authorize, and persist a workflow action with its comment.
async fn dispatch_action(
    state: &AppState,
    auth: &AuthUser,
    entry: &SafetyEntry,
    action: WorkflowAction,
    comment: Option<String>,
) -> AppResult<()> {
    let comment = comment.filter(|c| !c.trim().is_empty());
    if action.requires_comment() && comment.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A comment is required to {} this entry",
            action.as_str()
        ))));
    }

    let ctx = workflow::load_context(&state.pool, entry.workflow_id).await?;
    let active = ctx.active_node()?;

    if !may_dispatch_action(auth.actor(), ctx.status, active) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not allowed to act on this workflow step".into(),
        )));
    }

    let transition = apply_action(
        &ctx.process_nodes,
        ctx.status,
        ctx.workflow.current_node_index,
        action,
    )
    .map_err(AppError::Core)?;

    // State change and audit comment commit together or not at all.
    WorkflowRepo::record_action(
        &state.pool,
        ctx.workflow.id,
        transition.status,
        transition.current_node_index,
        &CreateComment {
            workflow_id: ctx.workflow.id,
            user_id: auth.user_id,
            action: action.as_str().to_string(),
            comment,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        workflow_id = ctx.workflow.id,
        action = action.as_str(),
        status = transition.status.as_str(),
        current_node_index = transition.current_node_index,
        "Workflow action applied"
    );
    Ok(())
}

/// Authorize and persist a form-data edit.
async fn apply_form_update(
    state: &AppState,
    auth: &AuthUser,
    entry: &SafetyEntry,
    form_data: serde_json::Value,
) -> AppResult<()> {
    let ctx = workflow::load_context(&state.pool, entry.workflow_id).await?;
    let active = ctx.active_node()?;
    let edit_access = ctx.active_edit_access()?;

    if !may_edit_form(auth.actor(), ctx.status, active, edit_access) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not allowed to edit this form".into(),
        )));
    }

    SafetyRepo::update_form_data(&state.pool, entry.id, &form_data, auth.user_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        safety_id = entry.id,
        "Safety form data updated"
    );
    Ok(())
}
