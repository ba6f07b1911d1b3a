//! GitHub API error types.

use thiserror::Error;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Non-success HTTP status from the API.
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded (429, or 403 with rate-limit semantics).
    #[error("GitHub rate limit exceeded")]
    RateLimited,

    /// Authentication required or token rejected.
    #[error("GitHub authentication required")]
    AuthRequired,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport-level failure (no response received).
    #[error("http error: {0}")]
    Http(String),

    /// Malformed response body.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Check whether an error is worth retrying.
///
/// Server errors, rate limits, and transport failures are the recoverable
/// class; other 4xx responses and malformed bodies fail immediately.
pub fn is_recoverable(e: &GitHubError) -> bool {
    match e {
        GitHubError::RateLimited => true,
        GitHubError::Http(_) => true,
        GitHubError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}
