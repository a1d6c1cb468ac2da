//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use siteform_core::types::{DbId, Timestamp};
use siteform_core::users::PickerUser;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses
/// directly. Use [`UserWithRole`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// User joined with the resolved role name, safe for API responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserWithRole {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub email: String,
    /// Resolved role name (e.g. `"admin"`, `"manager"`, `"worker"`).
    pub role: String,
    pub avatar_url: Option<String>,
}

impl UserWithRole {
    /// Shape used by the executor/CC picker filter.
    pub fn into_picker_user(self) -> PickerUser {
        PickerUser {
            id: self.id,
            name: self.display_name,
            role: self.role,
            email: self.email,
            avatar: self.avatar_url,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
}
