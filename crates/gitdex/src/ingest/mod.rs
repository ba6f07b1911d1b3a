//! Ingestion pipeline: pulls source entities, maps them, and pushes them
//! into a connection one at a time, surviving individual entity failures.

mod engine;
pub mod progress;

pub use engine::{PushOptions, PushReport, push_issues, push_repositories};
pub use progress::{ProgressCallback, PushProgress, emit};
