//! Talentflow domain logic: status vocabularies, gating rules, and the
//! error taxonomy shared across the workspace.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the workflow engine, and any future CLI tooling.

pub mod error;
pub mod gating;
pub mod interview;
pub mod metrics;
pub mod processing;
pub mod status;
pub mod types;

pub use error::CoreError;
