//! Multi-item execution with optional continue-on-error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::blockchain::types::ConnectorError;
use crate::dispatch::dispatcher::{Dispatcher, OperationRequest};

/// Output of one item, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemOutput {
    Failed { error: String },
    Success(Map<String, Value>),
}

impl ItemOutput {
    pub fn is_failed(&self) -> bool {
        matches!(self, ItemOutput::Failed { .. })
    }
}

/// First failure of a batch run without continue-on-error.
#[derive(Debug, thiserror::Error)]
#[error("item {index} failed: {source}")]
pub struct BatchError {
    pub index: usize,
    #[source]
    pub source: ConnectorError,
}

/// Run items sequentially.
///
/// With `continue_on_error` every failure becomes `{error}` in its slot;
/// otherwise the first failure aborts the run.
pub async fn run_batch(
    dispatcher: &Dispatcher,
    requests: &[OperationRequest],
    continue_on_error: bool,
) -> Result<Vec<ItemOutput>, BatchError> {
    let mut outputs = Vec::with_capacity(requests.len());

    for (index, request) in requests.iter().enumerate() {
        match dispatcher.dispatch(request).await {
            Ok(record) => outputs.push(ItemOutput::Success(record)),
            Err(e) if continue_on_error => {
                tracing::warn!(
                    index,
                    resource = %request.resource,
                    operation = %request.operation,
                    error = %e,
                    "Item failed, continuing"
                );
                outputs.push(ItemOutput::Failed {
                    error: e.to_string(),
                });
            }
            Err(source) => return Err(BatchError { index, source }),
        }
    }

    tracing::info!(
        items = requests.len(),
        failed = outputs.iter().filter(|o| o.is_failed()).count(),
        "Batch completed"
    );
    Ok(outputs)
}
