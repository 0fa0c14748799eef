//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Normalized read-model structs for the queries that join related
//!   entities (constructed once at the data-access boundary)

pub mod assignment;
pub mod document;
pub mod interview;
pub mod processing;
pub mod status;
pub mod user;
