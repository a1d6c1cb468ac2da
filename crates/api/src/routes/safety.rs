//! Route definitions for the `/safety` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::safety;
use crate::state::AppState;

/// Routes mounted at `/safety`.
///
/// ```text
/// GET    /{id}  -> get_safety_entry (full workflow view)
/// PUT    /{id}  -> update_safety_entry (form edit or workflow action)
/// DELETE /{id}  -> delete_safety_entry (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(safety::get_safety_entry)
            .put(safety::update_safety_entry)
            .delete(safety::delete_safety_entry),
    )
}
