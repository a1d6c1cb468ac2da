//! Handlers for the `/users` resource (executor / CC picker candidates).

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use siteform_core::users::{filter_users, PickerUser};
use siteform_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /users`.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Live search text; case-insensitive substring match against name,
    /// role, or email. Empty or absent returns everyone.
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/users?q=
///
/// Candidate list for the executor/CC picker. Requires authentication.
pub async fn list_users(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<impl IntoResponse> {
    let candidates: Vec<PickerUser> = UserRepo::list_active_with_roles(&state.pool)
        .await?
        .into_iter()
        .map(|u| u.into_picker_user())
        .collect();

    let matched: Vec<PickerUser> = filter_users(&candidates, &query.q)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(DataResponse { data: matched }))
}
