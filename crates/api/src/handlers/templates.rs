//! Handlers for the form-template resource.
//!
//! A template bundles a named multi-page form structure with the approval
//! chain new submissions of that form will follow.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use siteform_core::error::CoreError;
use siteform_core::types::DbId;
use siteform_core::workflow::ProcessNode;
use siteform_db::models::template::CreateFormTemplate;
use siteform_db::models::workflow::kinds;
use siteform_db::repositories::TemplateRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::projects::ensure_project_exists;
use crate::handlers::workflow;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{project_id}/templates`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, message = "Template name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub form_structure: serde_json::Value,
    pub process_nodes: Vec<ProcessNode>,
}

/// POST /api/v1/projects/{project_id}/templates
///
/// Create a template together with its workflow node chain, atomically.
pub async fn create_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTemplateRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    ensure_project_exists(&state.pool, project_id).await?;

    let instance = workflow::create_instance(
        &state.pool,
        kinds::FORM_TEMPLATE,
        auth.user_id,
        &input.process_nodes,
    )
    .await?;

    let create = CreateFormTemplate {
        project_id,
        workflow_id: instance.id,
        name: input.name,
        description: input.description,
        form_structure: input.form_structure,
        created_by: auth.user_id,
    };
    let template = TemplateRepo::create(&state.pool, &create).await?;

    tracing::info!(
        user_id = auth.user_id,
        template_id = template.id,
        workflow_id = instance.id,
        "Form template created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/projects/{project_id}/templates
pub async fn list_templates(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let templates = TemplateRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/templates/{id}
///
/// Template plus its workflow node chain.
pub async fn get_template(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormTemplate",
            id,
        }))?;
    let view = workflow::load_view(&state.pool, template.workflow_id).await?;

    Ok(Json(DataResponse {
        data: serde_json::json!({
            "template": template,
            "workflow": view,
        }),
    }))
}

/// DELETE /api/v1/templates/{id}
///
/// Admin-only deletion.
pub async fn delete_template(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = TemplateRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "FormTemplate",
            id,
        }));
    }
    tracing::info!(user_id = admin.user_id, template_id = id, "Form template deleted");
    Ok(StatusCode::NO_CONTENT)
}
