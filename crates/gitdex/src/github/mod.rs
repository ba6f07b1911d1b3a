//! GitHub REST API fetch client.
//!
//! Pulls the repository, its issues, and their timeline events, paginating
//! transparently and retrying transient failures with bounded backoff.

mod client;
mod error;
mod types;

pub use client::GitHubClient;
pub use error::{GitHubError, is_recoverable};
pub use types::{Actor, Issue, Label, Repository, TimelineEvent};
