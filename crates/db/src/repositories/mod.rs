//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod project_repo;
pub mod role_repo;
pub mod safety_repo;
pub mod template_repo;
pub mod user_repo;
pub mod workflow_repo;

pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use safety_repo::SafetyRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;
pub use workflow_repo::WorkflowRepo;
