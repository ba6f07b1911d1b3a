//! GitHub API data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub repository - fields we need from the API response.
///
/// Only the fields this crate consumes are declared, which keeps
/// deserialization resilient to API additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Repository ID.
    pub id: i64,
    /// Repository name.
    pub name: String,
    /// Full name including owner (e.g., "acme/widgets").
    pub full_name: String,
    /// Repository description.
    pub description: Option<String>,
    /// Whether the repository is private.
    pub private: bool,
    /// Canonical web URL.
    pub html_url: String,
    /// When the repo was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the repo was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// Owner information.
    pub owner: Actor,
}

/// GitHub issue - fields we need from the API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number (unique within the repository).
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body (markdown), may be null.
    pub body: Option<String>,
    /// Open or closed.
    pub state: String,
    /// Canonical web URL.
    pub html_url: String,
    /// Author.
    pub user: Actor,
    /// Assigned users.
    #[serde(default)]
    pub assignees: Vec<Actor>,
    /// Labels attached to the issue.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// When the issue was created.
    pub created_at: DateTime<Utc>,
    /// When the issue was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A user reference on an issue or event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

/// An issue label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// An entry from an issue timeline or a repository event feed.
///
/// GitHub returns timeline entries in chronological order; this crate
/// preserves that order end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Event kind (e.g., "commented", "closed", "labeled").
    ///
    /// Issue timelines use `event`; the repository event feed uses `type`
    /// (e.g., "IssuesEvent").
    #[serde(alias = "type")]
    pub event: String,
    /// The user who performed the action, when attributed.
    pub actor: Option<Actor>,
    /// Comment body, present for "commented" entries.
    pub body: Option<String>,
    /// When the event occurred.
    pub created_at: Option<DateTime<Utc>>,
}
