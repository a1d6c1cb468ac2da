pub mod auth;
pub mod projects;
pub mod safety;
pub mod templates;
pub mod users;
pub mod workflow;
