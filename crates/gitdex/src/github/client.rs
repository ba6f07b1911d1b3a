//! GitHub API client.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, header_get};
use crate::ingest::progress::ProgressCallback;
use crate::retry::with_retry;

use super::error::{GitHubError, is_recoverable};
use super::types::{Issue, Repository, TimelineEvent};

/// Page size for paginated endpoints.
const PAGE_SIZE: u32 = 100;

/// GitHub REST API client scoped to one configured repository.
///
/// All requests go through the [`HttpTransport`] seam so tests can run
/// against a mock transport.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a client with a real HTTP transport.
    pub fn new(
        host: &str,
        token: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| GitHubError::Http(e.to_string()))?;
        Ok(Self::with_transport(
            host,
            token,
            owner,
            repo,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        host: &str,
        token: &str,
        owner: &str,
        repo: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// Owner of the configured repository.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Name of the configured repository.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    fn request_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), "application/vnd.github+json".to_string()),
            ("User-Agent".to_string(), "gitdex".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
        ]
    }

    /// Make an authenticated GET request and deserialize the response.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let url = format!("{}{}", self.host, path);
        let request = HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: self.request_headers(),
            body: Vec::new(),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| GitHubError::Http(e.to_string()))?;

        Self::check_status(&response, path)?;
        serde_json::from_slice(&response.body).map_err(GitHubError::Json)
    }

    /// Map a non-success response to the matching error class.
    fn check_status(response: &HttpResponse, path: &str) -> Result<(), GitHubError> {
        let status = response.status;
        if (200..300).contains(&status) {
            return Ok(());
        }

        match status {
            429 => Err(GitHubError::RateLimited),
            403 if rate_limit_exhausted(response) => Err(GitHubError::RateLimited),
            401 | 403 => Err(GitHubError::AuthRequired),
            404 => Err(GitHubError::NotFound(path.to_string())),
            _ => Err(GitHubError::Api {
                status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }),
        }
    }

    /// Get the configured repository.
    pub async fn get_repository(&self) -> Result<Repository, GitHubError> {
        self.get(&format!("/repos/{}/{}", self.owner, self.repo))
            .await
    }

    /// List the owner's repositories, paginating until exhaustion.
    pub async fn list_repositories(&self) -> Result<Vec<Repository>, GitHubError> {
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let repos: Vec<Repository> = self
                .get(&format!(
                    "/users/{}/repos?per_page={}&page={}",
                    self.owner, PAGE_SIZE, page
                ))
                .await?;

            let count = repos.len();
            all.extend(repos);

            // A short page means we've reached the end
            if count < PAGE_SIZE as usize {
                break;
            }

            page += 1;
        }

        Ok(all)
    }

    /// List all issues (open and closed) for the configured repository.
    ///
    /// Pull requests are returned by this endpoint too; the caller decides
    /// whether to filter them.
    pub async fn list_issues(&self) -> Result<Vec<Issue>, GitHubError> {
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let issues: Vec<Issue> = self
                .get(&format!(
                    "/repos/{}/{}/issues?state=all&per_page={}&page={}",
                    self.owner, self.repo, PAGE_SIZE, page
                ))
                .await?;

            let count = issues.len();
            all.extend(issues);

            if count < PAGE_SIZE as usize {
                break;
            }

            page += 1;
        }

        Ok(all)
    }

    /// List the timeline events of one issue in chronological order.
    ///
    /// Each page request is retried up to `max_retries` times on recoverable
    /// failures. After retries are exhausted the whole call fails; the
    /// caller is expected to skip the issue rather than re-queue it.
    pub async fn list_issue_events(
        &self,
        issue_number: u64,
        max_retries: usize,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<Vec<TimelineEvent>, GitHubError> {
        let mut all = Vec::new();
        let mut page = 1u32;
        let label = format!("issue #{issue_number} timeline");

        loop {
            let path = format!(
                "/repos/{}/{}/issues/{}/timeline?per_page={}&page={}",
                self.owner, self.repo, issue_number, PAGE_SIZE, page
            );

            let events: Vec<TimelineEvent> = with_retry(
                || self.get(&path),
                is_recoverable,
                max_retries,
                &label,
                on_progress,
            )
            .await?;

            let count = events.len();
            all.extend(events);

            if count < PAGE_SIZE as usize {
                break;
            }

            page += 1;
        }

        Ok(all)
    }

    /// List the repository's event feed in the order GitHub returns it.
    ///
    /// Same retry contract as [`Self::list_issue_events`].
    pub async fn list_repository_events(
        &self,
        max_retries: usize,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<Vec<TimelineEvent>, GitHubError> {
        let mut all = Vec::new();
        let mut page = 1u32;
        let label = format!("{}/{} events", self.owner, self.repo);

        loop {
            let path = format!(
                "/repos/{}/{}/events?per_page={}&page={}",
                self.owner, self.repo, PAGE_SIZE, page
            );

            let events: Vec<TimelineEvent> = with_retry(
                || self.get(&path),
                is_recoverable,
                max_retries,
                &label,
                on_progress,
            )
            .await?;

            let count = events.len();
            all.extend(events);

            if count < PAGE_SIZE as usize {
                break;
            }

            page += 1;
        }

        Ok(all)
    }

    /// Fetch a rendered web page (used for public entity content).
    pub async fn fetch_html(&self, url: &str) -> Result<String, GitHubError> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: vec![
                ("Accept".to_string(), "text/html".to_string()),
                ("User-Agent".to_string(), "gitdex".to_string()),
            ],
            body: Vec::new(),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| GitHubError::Http(e.to_string()))?;

        Self::check_status(&response, url)?;
        Ok(String::from_utf8_lossy(&response.body).to_string())
    }
}

/// True when a 403 carries rate-limit exhaustion headers.
fn rate_limit_exhausted(response: &HttpResponse) -> bool {
    header_get(&response.headers, "x-ratelimit-remaining")
        .and_then(|v| v.parse::<u64>().ok())
        .is_some_and(|remaining| remaining == 0)
}
