//! Core settings consumed by the sync engine.
//!
//! The CLI (or any other host) is responsible for loading these values from
//! files and environment variables; the core only validates that everything
//! it needs is present.

use serde::Deserialize;
use thiserror::Error;

/// Default base URL for the GitHub REST API.
pub const DEFAULT_GITHUB_HOST: &str = "https://api.github.com";

/// Default base URL for the Microsoft Graph API.
pub const DEFAULT_GRAPH_HOST: &str = "https://graph.microsoft.com/v1.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is missing or empty. Fatal at startup.
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),
}

/// Settings required by the core sync engine.
///
/// All fields except the host overrides are required and validated as
/// non-empty by [`Settings::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// GitHub personal access token.
    pub github_token: String,
    /// Owner (user or org) of the repository to sync.
    pub owner: String,
    /// Name of the repository to sync.
    pub repo: String,
    /// Access token for the Graph connector API.
    pub graph_token: String,
    /// Surrogate identity id that every source login resolves to.
    pub placeholder_user_id: String,
    /// GitHub API base URL override.
    #[serde(default = "default_github_host")]
    pub github_host: String,
    /// Graph API base URL override.
    #[serde(default = "default_graph_host")]
    pub graph_host: String,
}

fn default_github_host() -> String {
    DEFAULT_GITHUB_HOST.to_string()
}

fn default_graph_host() -> String {
    DEFAULT_GRAPH_HOST.to_string()
}

impl Settings {
    /// Check that every required setting is present and non-empty.
    ///
    /// Returns the first missing setting by name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github_token.trim().is_empty() {
            return Err(ConfigError::MissingSetting("github_token"));
        }
        if self.owner.trim().is_empty() {
            return Err(ConfigError::MissingSetting("owner"));
        }
        if self.repo.trim().is_empty() {
            return Err(ConfigError::MissingSetting("repo"));
        }
        if self.graph_token.trim().is_empty() {
            return Err(ConfigError::MissingSetting("graph_token"));
        }
        if self.placeholder_user_id.trim().is_empty() {
            return Err(ConfigError::MissingSetting("placeholder_user_id"));
        }
        Ok(())
    }
}
