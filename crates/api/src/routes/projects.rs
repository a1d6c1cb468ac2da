//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{projects, safety, templates};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET  /                           list_projects
/// POST /                           create_project
/// GET  /{id}                       get_project
/// GET  /{project_id}/templates     list_templates
/// POST /{project_id}/templates     create_template
/// GET  /{project_id}/safety        list_safety_entries
/// POST /{project_id}/safety        create_safety_entry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route("/{id}", get(projects::get_project))
        .route(
            "/{project_id}/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/{project_id}/safety",
            get(safety::list_safety_entries).post(safety::create_safety_entry),
        )
}
