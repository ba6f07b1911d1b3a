//! Shared retry utilities for remote API calls.
//!
//! The fetch layer retries transient GitHub failures with exponential
//! backoff. Graph operations are never retried here; the ingestion pipeline
//! handles their failures per entity.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::ingest::progress::{PushProgress, ProgressCallback, emit};

/// Initial backoff delay in milliseconds.
pub const INITIAL_BACKOFF_MS: u64 = 1_000;

/// Maximum backoff delay in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Default number of retries for a single event-page fetch.
pub const DEFAULT_EVENT_FETCH_RETRIES: usize = 3;

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Minimum delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: usize,
    /// Whether to add jitter to delays.
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
            max_retries: DEFAULT_EVENT_FETCH_RETRIES,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn new(min_delay: Duration, max_delay: Duration, max_retries: usize) -> Self {
        Self {
            min_delay,
            max_delay,
            max_retries,
            with_jitter: true,
        }
    }

    /// Build an exponential backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }
}

/// Build a backoff strategy capped at `max_retries` attempts.
#[must_use]
pub fn backoff_with_retries(max_retries: usize) -> ExponentialBuilder {
    RetryConfig {
        max_retries,
        ..RetryConfig::default()
    }
    .into_backoff()
}

/// Execute an operation, retrying recoverable errors with backoff.
///
/// `is_recoverable` decides which errors are retried; anything else fails
/// immediately. Each retry emits a [`PushProgress::FetchRetry`] event naming
/// the entity whose data is being fetched and logs at debug level.
pub async fn with_retry<T, E, F, Fut, IsRecoverable>(
    mut operation: F,
    is_recoverable: IsRecoverable,
    max_retries: usize,
    entity: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
    IsRecoverable: Fn(&E) -> bool + Send + Sync + 'static,
{
    let entity_label = entity.to_string();

    // Track attempt number for progress reporting
    let attempt = AtomicU32::new(0);

    let retry_op = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    retry_op
        .retry(backoff_with_retries(max_retries))
        .notify(|err, dur| {
            let current_attempt = attempt.load(Ordering::SeqCst);
            emit(
                on_progress,
                PushProgress::FetchRetry {
                    entity: entity_label.clone(),
                    retry_after_ms: dur.as_millis() as u64,
                    attempt: current_attempt,
                },
            );
            tracing::debug!(
                "recoverable failure fetching {}, retrying in {:?} (attempt {}): {}",
                entity_label,
                dur,
                current_attempt,
                err
            );
        })
        .when(is_recoverable)
        .await
}
