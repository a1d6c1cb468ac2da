pub mod auth;
pub mod health;
pub mod projects;
pub mod safety;
pub mod templates;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
///
/// /users                                   picker candidates (auth required)
///
/// /projects                                list, create
/// /projects/{id}                           get
/// /projects/{project_id}/templates         list, create
/// /projects/{project_id}/safety            list, create
///
/// /templates/{id}                          get, delete (delete admin only)
///
/// /safety/{id}                             get, update, delete (delete admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/projects", projects::router())
        .nest("/templates", templates::router())
        .nest("/safety", safety::router())
}
