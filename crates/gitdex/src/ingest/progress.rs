//! Progress events emitted by the push pipeline.
//!
//! The library never prints; callers pass a [`ProgressCallback`] and render
//! events however they like. The CLI turns them into console lines.

use crate::graph::ItemType;

/// One observable step of a push run.
#[derive(Debug, Clone)]
pub enum PushProgress {
    /// Source enumeration started.
    Listing { kind: ItemType },
    /// Source enumeration finished with `count` entities.
    Listed { kind: ItemType, count: usize },
    /// An entity's timeline was fetched.
    EventsFetched { entity: String, count: usize },
    /// A recoverable fetch failure will be retried after a delay.
    FetchRetry {
        entity: String,
        retry_after_ms: u64,
        attempt: u32,
    },
    /// An entity's item (and activities, if any) reached the index.
    Pushed { entity: String, activities: usize },
    /// An entity was skipped or partially pushed; the run continues.
    EntityError { entity: String, message: String },
    /// The run finished.
    Complete {
        processed: usize,
        pushed: usize,
        skipped: usize,
        errors: usize,
    },
}

/// Callback invoked for each [`PushProgress`] event.
pub type ProgressCallback = Box<dyn Fn(PushProgress) + Send + Sync>;

/// Invoke the callback if one was provided.
pub fn emit(on_progress: Option<&ProgressCallback>, event: PushProgress) {
    if let Some(callback) = on_progress {
        callback(event);
    }
}
