//! Form template entity model and DTOs.

use serde::{Deserialize, Serialize};
use siteform_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `form_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormTemplate {
    pub id: DbId,
    pub project_id: DbId,
    pub workflow_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// The multi-page form structure, stored verbatim as JSON.
    pub form_structure: serde_json::Value,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new form template.
#[derive(Debug, Deserialize)]
pub struct CreateFormTemplate {
    pub project_id: DbId,
    pub workflow_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub form_structure: serde_json::Value,
    pub created_by: DbId,
}
