//! Sequential push pipeline: fetch, map, upsert, one entity at a time.

use tracing::{info, warn};

use crate::github::{GitHubClient, GitHubError, Issue, Repository};
use crate::graph::{GraphClient, ItemType};
use crate::map::{Mapper, with_html_content, with_json_content};

use super::progress::{ProgressCallback, PushProgress, emit};

/// Knobs for one push run.
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// Retries per event-page fetch before the entity is skipped.
    pub max_event_retries: usize,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            max_event_retries: crate::retry::DEFAULT_EVENT_FETCH_RETRIES,
        }
    }
}

/// Outcome of one push run. A run that recorded errors still pushed
/// everything it could; callers inspect `errors` to decide severity.
#[derive(Debug, Clone, Default)]
pub struct PushReport {
    /// Entities the pipeline looked at.
    pub processed: usize,
    /// Entities whose item reached the index.
    pub pushed: usize,
    /// Activities submitted across all entities.
    pub activities: usize,
    /// Entities skipped without an item upsert.
    pub skipped: usize,
    /// One message per failed step, in encounter order.
    pub errors: Vec<String>,
}

/// Push every issue of the configured repository into the connection.
///
/// Entities are processed strictly sequentially. A failure while fetching
/// one issue's timeline, attaching content, upserting, or submitting
/// activities is recorded in the report and the loop moves on; only the
/// initial listing aborts the whole run.
#[tracing::instrument(skip(github, graph, mapper, options, on_progress))]
pub async fn push_issues(
    github: &GitHubClient,
    graph: &GraphClient,
    mapper: &Mapper,
    connection_id: &str,
    options: &PushOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<PushReport, GitHubError> {
    emit(on_progress, PushProgress::Listing {
        kind: ItemType::Issues,
    });

    let repository = github.get_repository().await?;
    let issues = github.list_issues().await?;
    info!(count = issues.len(), "issues listed");
    emit(on_progress, PushProgress::Listed {
        kind: ItemType::Issues,
        count: issues.len(),
    });

    let mut report = PushReport::default();

    for issue in &issues {
        report.processed += 1;
        let entity = format!("issue #{}", issue.number);

        let events = match github
            .list_issue_events(issue.number, options.max_event_retries, on_progress)
            .await
        {
            Ok(events) => events,
            Err(err) => {
                record_failure(&mut report, on_progress, &entity, &err);
                report.skipped += 1;
                continue;
            }
        };
        emit(on_progress, PushProgress::EventsFetched {
            entity: entity.clone(),
            count: events.len(),
        });

        let item = mapper.issue_item(issue);
        let item = match attach_issue_content(github, &repository, issue, item).await {
            Ok(item) => item,
            Err(err) => {
                record_failure(&mut report, on_progress, &entity, &err);
                report.skipped += 1;
                continue;
            }
        };

        let item_id = Mapper::issue_item_id(issue);
        if let Err(err) = graph.put_item(connection_id, &item_id, &item).await {
            record_failure(&mut report, on_progress, &entity, &err);
            report.skipped += 1;
            continue;
        }
        report.pushed += 1;

        let activities = mapper.issue_activities(&events);
        let submitted = activities.len();
        match graph
            .add_activities(connection_id, &item_id, &activities)
            .await
        {
            Ok(()) => {
                report.activities += submitted;
                emit(on_progress, PushProgress::Pushed {
                    entity,
                    activities: submitted,
                });
            }
            // The item landed; only its feed is missing.
            Err(err) => record_failure(&mut report, on_progress, &entity, &err),
        }
    }

    finish(&mut report, on_progress);
    Ok(report)
}

/// Push every repository owned by the configured owner.
///
/// Same per-entity error discipline as [`push_issues`]; repositories carry
/// no activity feed.
#[tracing::instrument(skip(github, graph, mapper, on_progress))]
pub async fn push_repositories(
    github: &GitHubClient,
    graph: &GraphClient,
    mapper: &Mapper,
    connection_id: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<PushReport, GitHubError> {
    emit(on_progress, PushProgress::Listing {
        kind: ItemType::Repositories,
    });

    let repositories = github.list_repositories().await?;
    info!(count = repositories.len(), "repositories listed");
    emit(on_progress, PushProgress::Listed {
        kind: ItemType::Repositories,
        count: repositories.len(),
    });

    let mut report = PushReport::default();

    for repository in &repositories {
        report.processed += 1;
        let entity = repository.full_name.clone();

        let item = mapper.repository_item(repository);
        let item = match attach_repository_content(github, repository, item).await {
            Ok(item) => item,
            Err(err) => {
                record_failure(&mut report, on_progress, &entity, &err);
                report.skipped += 1;
                continue;
            }
        };

        let item_id = Mapper::repository_item_id(repository);
        match graph.put_item(connection_id, &item_id, &item).await {
            Ok(()) => {
                report.pushed += 1;
                emit(on_progress, PushProgress::Pushed {
                    entity,
                    activities: 0,
                });
            }
            Err(err) => {
                record_failure(&mut report, on_progress, &entity, &err);
                report.skipped += 1;
            }
        }
    }

    finish(&mut report, on_progress);
    Ok(report)
}

/// Fill the item's content: rendered HTML for public entities, the entity's
/// JSON as a fallback when the page is private or the fetch fails.
async fn attach_issue_content(
    github: &GitHubClient,
    repository: &Repository,
    issue: &Issue,
    item: crate::graph::ExternalItem,
) -> Result<crate::graph::ExternalItem, serde_json::Error> {
    if !repository.private {
        match github.fetch_html(&issue.html_url).await {
            Ok(html) => return Ok(with_html_content(item, html)),
            Err(err) => {
                warn!(issue = issue.number, error = %err, "html fetch failed, using json content");
            }
        }
    }
    with_json_content(item, issue)
}

async fn attach_repository_content(
    github: &GitHubClient,
    repository: &Repository,
    item: crate::graph::ExternalItem,
) -> Result<crate::graph::ExternalItem, serde_json::Error> {
    if !repository.private {
        match github.fetch_html(&repository.html_url).await {
            Ok(html) => return Ok(with_html_content(item, html)),
            Err(err) => {
                warn!(repository = %repository.full_name, error = %err, "html fetch failed, using json content");
            }
        }
    }
    with_json_content(item, repository)
}

fn record_failure(
    report: &mut PushReport,
    on_progress: Option<&ProgressCallback>,
    entity: &str,
    err: &dyn std::error::Error,
) {
    warn!(entity, error = %err, "entity step failed, continuing");
    report.errors.push(format!("{entity}: {err}"));
    emit(on_progress, PushProgress::EntityError {
        entity: entity.to_string(),
        message: err.to_string(),
    });
}

fn finish(report: &mut PushReport, on_progress: Option<&ProgressCallback>) {
    info!(
        processed = report.processed,
        pushed = report.pushed,
        activities = report.activities,
        skipped = report.skipped,
        errors = report.errors.len(),
        "push run complete"
    );
    emit(on_progress, PushProgress::Complete {
        processed: report.processed,
        pushed: report.pushed,
        skipped: report.skipped,
        errors: report.errors.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphClient;
    use crate::http::{HttpMethod, HttpResponse, MockTransport};
    use crate::identity::PlaceholderResolver;
    use std::sync::Arc;

    const GITHUB_HOST: &str = "https://api.github.test";
    const GRAPH_HOST: &str = "https://graph.test/v1.0";
    const CONNECTION: &str = "gitdexissues";

    struct Fixture {
        transport: MockTransport,
        github: GitHubClient,
        graph: GraphClient,
        mapper: Mapper,
    }

    fn fixture() -> Fixture {
        let transport = MockTransport::new();
        let github = GitHubClient::with_transport(
            GITHUB_HOST,
            "token",
            "acme",
            "widgets",
            Arc::new(transport.clone()),
        );
        let graph = GraphClient::with_transport(GRAPH_HOST, "token", Arc::new(transport.clone()));
        let mapper = Mapper::new(Arc::new(PlaceholderResolver::new("surrogate")));
        Fixture {
            transport,
            github,
            graph,
            mapper,
        }
    }

    fn repo_json(private: bool) -> String {
        format!(
            r#"{{
                "id": 7,
                "name": "widgets",
                "full_name": "acme/widgets",
                "description": "Widget factory",
                "private": {private},
                "html_url": "https://github.com/acme/widgets",
                "created_at": "2023-06-01T00:00:00Z",
                "updated_at": "2024-05-01T00:00:00Z",
                "owner": {{"login": "acme"}}
            }}"#
        )
    }

    fn issue_json(number: u64) -> String {
        format!(
            r#"{{
                "number": {number},
                "title": "Issue {number}",
                "body": "body",
                "state": "open",
                "html_url": "https://github.com/acme/widgets/issues/{number}",
                "user": {{"login": "octocat"}},
                "assignees": [],
                "labels": [],
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-02T00:00:00Z"
            }}"#
        )
    }

    fn mock_repo(f: &Fixture, private: bool) {
        f.transport.push_json(
            HttpMethod::Get,
            format!("{GITHUB_HOST}/repos/acme/widgets"),
            &repo_json(private),
        );
    }

    fn mock_issue_list(f: &Fixture, numbers: &[u64]) {
        let body: Vec<String> = numbers.iter().map(|n| issue_json(*n)).collect();
        f.transport.push_json(
            HttpMethod::Get,
            format!("{GITHUB_HOST}/repos/acme/widgets/issues?state=all&per_page=100&page=1"),
            &format!("[{}]", body.join(",")),
        );
    }

    fn timeline_url(number: u64) -> String {
        format!("{GITHUB_HOST}/repos/acme/widgets/issues/{number}/timeline?per_page=100&page=1")
    }

    fn item_url(id: &str) -> String {
        format!("{GRAPH_HOST}/external/connections/{CONNECTION}/items/{id}")
    }

    fn activities_url(id: &str) -> String {
        format!("{GRAPH_HOST}/external/connections/{CONNECTION}/items/{id}/addActivities")
    }

    fn no_retry() -> PushOptions {
        PushOptions {
            max_event_retries: 0,
        }
    }

    #[tokio::test]
    async fn one_failing_issue_does_not_abort_the_run() {
        let f = fixture();
        mock_repo(&f, false);
        mock_issue_list(&f, &[1, 2]);

        // Issue 1's timeline keeps failing and the issue is skipped.
        f.transport.push_response(
            HttpMethod::Get,
            timeline_url(1),
            HttpResponse {
                status: 500,
                headers: Vec::new(),
                body: b"boom".to_vec(),
            },
        );

        f.transport.push_json(
            HttpMethod::Get,
            timeline_url(2),
            r#"[{"event": "commented", "actor": {"login": "octocat"}, "body": "LGTM", "created_at": "2024-02-01T00:00:00Z"}]"#,
        );
        f.transport.push_json(
            HttpMethod::Get,
            "https://github.com/acme/widgets/issues/2",
            "<html>issue 2</html>",
        );
        f.transport.push_json(HttpMethod::Put, item_url("2"), "{}");
        f.transport.push_json(HttpMethod::Post, activities_url("2"), "{}");

        let report = push_issues(
            &f.github,
            &f.graph,
            &f.mapper,
            CONNECTION,
            &no_retry(),
            None,
        )
        .await
        .expect("run completes");

        assert_eq!(report.processed, 2);
        assert_eq!(report.pushed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.activities, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("issue #1"));
        // Nothing for issue 1 reached the index.
        assert_eq!(f.transport.request_count(HttpMethod::Put, &item_url("1")), 0);
    }

    #[tokio::test]
    async fn empty_activity_batch_sends_no_post() {
        let f = fixture();
        mock_repo(&f, false);
        mock_issue_list(&f, &[5]);
        f.transport.push_json(
            HttpMethod::Get,
            timeline_url(5),
            r#"[{"event": "labeled", "actor": {"login": "octocat"}, "created_at": "2024-02-01T00:00:00Z"}]"#,
        );
        f.transport.push_json(
            HttpMethod::Get,
            "https://github.com/acme/widgets/issues/5",
            "<html>issue 5</html>",
        );
        f.transport.push_json(HttpMethod::Put, item_url("5"), "{}");

        let report = push_issues(
            &f.github,
            &f.graph,
            &f.mapper,
            CONNECTION,
            &no_retry(),
            None,
        )
        .await
        .expect("run completes");

        assert_eq!(report.pushed, 1);
        assert_eq!(report.activities, 0);
        assert!(report.errors.is_empty());
        assert_eq!(
            f.transport
                .request_count(HttpMethod::Post, &activities_url("5")),
            0
        );
    }

    #[tokio::test]
    async fn private_repository_issues_get_json_content() {
        let f = fixture();
        mock_repo(&f, true);
        mock_issue_list(&f, &[9]);
        f.transport
            .push_json(HttpMethod::Get, timeline_url(9), "[]");
        f.transport.push_json(HttpMethod::Put, item_url("9"), "{}");

        let report = push_issues(
            &f.github,
            &f.graph,
            &f.mapper,
            CONNECTION,
            &no_retry(),
            None,
        )
        .await
        .expect("run completes");
        assert_eq!(report.pushed, 1);

        // No page fetch for a private repository.
        assert_eq!(
            f.transport.request_count(
                HttpMethod::Get,
                "https://github.com/acme/widgets/issues/9"
            ),
            0
        );
        let put = f
            .transport
            .requests()
            .into_iter()
            .find(|r| r.method == HttpMethod::Put)
            .expect("item upsert");
        let sent: serde_json::Value = serde_json::from_slice(&put.body).expect("json body");
        assert_eq!(sent["content"]["type"], "text");
        assert!(sent["content"]["value"].as_str().expect("value").contains("Issue 9"));
    }

    #[tokio::test]
    async fn html_fetch_failure_falls_back_to_json_content() {
        let f = fixture();
        mock_repo(&f, false);
        mock_issue_list(&f, &[3]);
        f.transport
            .push_json(HttpMethod::Get, timeline_url(3), "[]");
        f.transport.push_response(
            HttpMethod::Get,
            "https://github.com/acme/widgets/issues/3",
            HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: Vec::new(),
            },
        );
        f.transport.push_json(HttpMethod::Put, item_url("3"), "{}");

        let report = push_issues(
            &f.github,
            &f.graph,
            &f.mapper,
            CONNECTION,
            &no_retry(),
            None,
        )
        .await
        .expect("run completes");

        assert_eq!(report.pushed, 1);
        assert!(report.errors.is_empty());
        let put = f
            .transport
            .requests()
            .into_iter()
            .find(|r| r.method == HttpMethod::Put)
            .expect("item upsert");
        let sent: serde_json::Value = serde_json::from_slice(&put.body).expect("json body");
        assert_eq!(sent["content"]["type"], "text");
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_run() {
        let f = fixture();
        f.transport.push_response(
            HttpMethod::Get,
            format!("{GITHUB_HOST}/repos/acme/widgets"),
            HttpResponse {
                status: 500,
                headers: Vec::new(),
                body: Vec::new(),
            },
        );

        let err = push_issues(
            &f.github,
            &f.graph,
            &f.mapper,
            CONNECTION,
            &no_retry(),
            None,
        )
        .await
        .expect_err("listing failure is fatal");
        assert!(matches!(err, GitHubError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn push_repositories_uses_numeric_item_ids() {
        let f = fixture();
        f.transport.push_json(
            HttpMethod::Get,
            format!("{GITHUB_HOST}/users/acme/repos?per_page=100&page=1"),
            &format!("[{}]", repo_json(true)),
        );
        f.transport.push_json(HttpMethod::Put, item_url("7"), "{}");

        let report = push_repositories(&f.github, &f.graph, &f.mapper, CONNECTION, None)
            .await
            .expect("run completes");

        assert_eq!(report.processed, 1);
        assert_eq!(report.pushed, 1);
        assert_eq!(report.activities, 0);
        assert_eq!(f.transport.request_count(HttpMethod::Put, &item_url("7")), 1);
    }

    #[tokio::test]
    async fn upsert_failure_is_recorded_and_the_run_continues() {
        let f = fixture();
        f.transport.push_json(
            HttpMethod::Get,
            format!("{GITHUB_HOST}/users/acme/repos?per_page=100&page=1"),
            &format!("[{}]", repo_json(true)),
        );
        f.transport.push_response(
            HttpMethod::Put,
            item_url("7"),
            HttpResponse {
                status: 401,
                headers: Vec::new(),
                body: br#"{"error":{"code":"InvalidAuthenticationToken","message":"expired"}}"#
                    .to_vec(),
            },
        );

        let report = push_repositories(&f.github, &f.graph, &f.mapper, CONNECTION, None)
            .await
            .expect("run completes");

        assert_eq!(report.pushed, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("InvalidAuthenticationToken"));
    }
}
