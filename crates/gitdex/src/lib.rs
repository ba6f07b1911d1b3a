//! Gitdex - a GitHub-to-search-connector sync engine.
//!
//! This library pulls repositories, issues, and issue timelines from the
//! GitHub REST API and pushes them into a Microsoft Graph external
//! connection as searchable items with activity feeds.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gitdex::{GitHubClient, GraphClient, Mapper, PlaceholderResolver, ingest};
//!
//! let github = GitHubClient::new(host, token, "acme", "widgets")?;
//! let graph = GraphClient::new(graph_host, graph_token)?;
//! let mapper = Mapper::new(Arc::new(PlaceholderResolver::new(user_id)));
//!
//! let report = ingest::push_issues(
//!     &github, &graph, &mapper, "gitdexissues",
//!     &ingest::PushOptions::default(), None,
//! ).await?;
//! println!("pushed {} of {}", report.pushed, report.processed);
//! ```

pub mod config;
pub mod github;
pub mod graph;
pub mod http;
pub mod identity;
pub mod ingest;
pub mod map;
pub mod retry;

pub use config::{ConfigError, Settings};
pub use github::{GitHubClient, GitHubError};
pub use graph::{GraphClient, GraphError, ItemType, RegistrationError, RegistrationOptions};
pub use identity::{ExternalIdentity, IdentityResolver, PlaceholderResolver};
pub use ingest::{ProgressCallback, PushOptions, PushProgress, PushReport};
pub use map::Mapper;
