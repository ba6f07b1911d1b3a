//! Asynchronous schema registration.
//!
//! Submitting a schema only starts a server-side operation; this module
//! drives it to a terminal state by polling, bounded by a deadline and a
//! cancellation token.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::client::GraphClient;
use super::error::GraphError;
use super::schema::ItemType;
use super::types::OperationStatus;

/// Polling knobs for [`register_schema`].
#[derive(Debug, Clone)]
pub struct RegistrationOptions {
    /// Delay between status reads.
    pub poll_interval: Duration,
    /// Overall deadline, counted from schema submission.
    pub timeout: Duration,
}

impl Default for RegistrationOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The service reached a terminal failed state.
    #[error("schema registration failed: {message}")]
    Failed { message: String },

    /// The deadline passed without the operation reaching a terminal state.
    /// The operation may still complete on the server later.
    #[error("schema registration still pending after {waited:?}")]
    TimedOut { waited: Duration },

    /// The caller cancelled while the operation was still pending.
    #[error("schema registration cancelled")]
    Cancelled,

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Submit the schema for `item_type` and wait for the registration
/// operation to complete.
///
/// Polls every `poll_interval` until the operation reports `completed`
/// (Ok), reports `failed` ([`RegistrationError::Failed`], carrying the
/// remote message), the deadline passes ([`RegistrationError::TimedOut`]),
/// or `cancel` fires ([`RegistrationError::Cancelled`], observed promptly
/// even mid-sleep). A failed status read aborts immediately rather than
/// being retried, since a broken poll channel leaves the outcome unknowable.
#[tracing::instrument(skip(client, options, cancel), fields(item_type = %item_type))]
pub async fn register_schema(
    client: &GraphClient,
    connection_id: &str,
    item_type: ItemType,
    options: &RegistrationOptions,
    cancel: &CancellationToken,
) -> Result<(), RegistrationError> {
    let handle = client.put_schema(connection_id, &item_type.schema()).await?;
    info!(operation_id = %handle.operation_id, "schema submitted");

    let start = Instant::now();
    let deadline = start + options.timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(RegistrationError::TimedOut {
                waited: start.elapsed(),
            });
        }

        let wait = options.poll_interval.min(remaining);
        tokio::select! {
            () = cancel.cancelled() => return Err(RegistrationError::Cancelled),
            () = tokio::time::sleep(wait) => {}
        }

        let operation = client.get_operation(&handle).await?;
        debug!(status = ?operation.status, "operation polled");

        match operation.status {
            OperationStatus::Completed => {
                info!(operation_id = %handle.operation_id, "schema registered");
                return Ok(());
            }
            OperationStatus::Failed => {
                let message = operation
                    .error
                    .map(|e| e.message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "no error details provided".to_string());
                return Err(RegistrationError::Failed { message });
            }
            _ => {}
        }
    }
}
