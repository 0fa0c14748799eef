//! Batch fan-out with independent per-item outcomes.
//!
//! A bulk request is deliberately **not** one outer transaction: each item
//! runs the single-item operation (which owns its own transaction), and a
//! failure in item *n* neither aborts the batch nor rolls back other items.
//! Items run sequentially; bounded concurrency can be introduced later if
//! bulk latency ever matters.

use std::future::Future;

use serde::Serialize;

use crate::error::EngineError;

/// Outcome of one item in a bulk operation.
#[derive(Debug, Serialize)]
pub struct BulkItemResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl<T> BulkItemResult<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    fn err(err: EngineError) -> Self {
        let details = match &err {
            EngineError::Invalid(validation) => serde_json::to_value(validation).ok(),
            _ => None,
        };
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            details,
        }
    }
}

/// Run `op` over each item, collecting one result per input in order.
pub async fn run_each<I, T, F, Fut>(items: Vec<I>, mut op: F) -> Vec<BulkItemResult<T>>
where
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<T, EngineError>>,
{
    let mut results = Vec::with_capacity(items.len());
    for item in items {
        match op(item).await {
            Ok(data) => results.push(BulkItemResult::ok(data)),
            Err(err) => {
                tracing::debug!(error = %err, "Bulk item failed");
                results.push(BulkItemResult::err(err));
            }
        }
    }
    results
}
