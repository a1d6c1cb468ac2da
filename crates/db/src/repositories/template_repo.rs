//! Repository for the `form_templates` table.

use siteform_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::{CreateFormTemplate, FormTemplate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, workflow_id, name, description, \
                        form_structure, created_by, created_at, updated_at";

/// Provides CRUD operations for form templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFormTemplate,
    ) -> Result<FormTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_templates
                (project_id, workflow_id, name, description, form_structure, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormTemplate>(&query)
            .bind(input.project_id)
            .bind(input.workflow_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.form_structure)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a template by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FormTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_templates WHERE id = $1");
        sqlx::query_as::<_, FormTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's templates, most recently created first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<FormTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_templates
             WHERE project_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, FormTemplate>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a template. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
