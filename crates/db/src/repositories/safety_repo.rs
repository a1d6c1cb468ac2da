//! Repository for the `safety_entries` table.

use siteform_core::types::DbId;
use sqlx::PgPool;

use crate::models::safety::{CreateSafetyEntry, SafetyEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, workflow_id, form_data, created_by, \
                        updated_by, created_at, updated_at";

/// Provides CRUD operations for safety entries.
pub struct SafetyRepo;

impl SafetyRepo {
    /// Insert a new safety entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSafetyEntry,
    ) -> Result<SafetyEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO safety_entries (project_id, workflow_id, form_data, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SafetyEntry>(&query)
            .bind(input.project_id)
            .bind(input.workflow_id)
            .bind(&input.form_data)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a safety entry by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SafetyEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM safety_entries WHERE id = $1");
        sqlx::query_as::<_, SafetyEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's safety entries, most recently created first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<SafetyEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM safety_entries
             WHERE project_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SafetyEntry>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the entry's form data, recording who edited it.
    pub async fn update_form_data(
        pool: &PgPool,
        id: DbId,
        form_data: &serde_json::Value,
        updated_by: DbId,
    ) -> Result<Option<SafetyEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE safety_entries
             SET form_data = $2, updated_by = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SafetyEntry>(&query)
            .bind(id)
            .bind(form_data)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Delete a safety entry. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM safety_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
