//! Safety entry entity model and DTOs.

use serde::{Deserialize, Serialize};
use siteform_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `safety_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SafetyEntry {
    pub id: DbId,
    pub project_id: DbId,
    pub workflow_id: DbId,
    /// The filled-in form data, stored verbatim as JSON.
    pub form_data: serde_json::Value,
    pub created_by: DbId,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new safety entry.
#[derive(Debug, Deserialize)]
pub struct CreateSafetyEntry {
    pub project_id: DbId,
    pub workflow_id: DbId,
    pub form_data: serde_json::Value,
    pub created_by: DbId,
}
