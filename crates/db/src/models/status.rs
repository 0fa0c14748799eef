//! Status catalog rows.

use serde::Serialize;
use sqlx::FromRow;
use talentflow_core::types::StatusId;

/// A row from the `main_statuses` or `sub_statuses` lookup table.
///
/// `name` is the stable key matched by the compile-time enums in
/// `talentflow_core::status`; `id` and `label` are the open-ended parts
/// only the catalog knows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusRecord {
    pub id: StatusId,
    pub name: String,
    pub label: String,
}
