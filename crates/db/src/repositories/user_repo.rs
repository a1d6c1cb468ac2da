//! Repository for the `users` table.

use siteform_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserWithRole};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, display_name, email, password_hash, role_id, \
                        avatar_url, is_active, created_at, updated_at";

/// Columns for the user + role-name join.
const JOINED_COLUMNS: &str =
    "u.id, u.username, u.display_name, u.email, r.name AS role, u.avatar_url";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, display_name, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.display_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List active users with resolved role names, for the picker.
    /// Ordered by display name ascending.
    pub async fn list_active_with_roles(
        pool: &PgPool,
    ) -> Result<Vec<UserWithRole>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.is_active
             ORDER BY u.display_name ASC"
        );
        sqlx::query_as::<_, UserWithRole>(&query).fetch_all(pool).await
    }
}
