//! Route definitions for the `/templates` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// ```text
/// GET    /{id}  -> get_template (with workflow chain)
/// DELETE /{id}  -> delete_template (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(templates::get_template).delete(templates::delete_template),
    )
}
