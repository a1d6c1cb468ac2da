//! Domain logic for the siteform approval-workflow service.
//!
//! This crate has zero internal dependencies so it can be used by the DB
//! and API layers alike. It contains the process-node model, the node-list
//! editor used while composing a workflow, the runtime that advances a
//! persisted workflow instance, and the permission rules gating who may
//! act on it.

pub mod error;
pub mod permissions;
pub mod roles;
pub mod types;
pub mod users;
pub mod workflow;
