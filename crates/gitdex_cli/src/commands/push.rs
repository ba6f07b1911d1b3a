use std::sync::Arc;

use console::style;
use gitdex::ingest::{self, PushOptions, PushReport};
use gitdex::{GitHubClient, GraphClient, Mapper, PlaceholderResolver, Settings};

use crate::progress;

fn clients(settings: &Settings) -> Result<(GitHubClient, GraphClient, Mapper), Box<dyn std::error::Error>> {
    let github = GitHubClient::new(
        &settings.github_host,
        &settings.github_token,
        &settings.owner,
        &settings.repo,
    )?;
    let graph = GraphClient::new(&settings.graph_host, &settings.graph_token)?;
    let mapper = Mapper::new(Arc::new(PlaceholderResolver::new(
        settings.placeholder_user_id.clone(),
    )));
    Ok((github, graph, mapper))
}

pub(crate) async fn issues(
    settings: &Settings,
    connection_id: &str,
    max_event_retries: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let (github, graph, mapper) = clients(settings)?;
    let options = PushOptions { max_event_retries };
    let callback = progress::progress_callback();

    let report = ingest::push_issues(
        &github,
        &graph,
        &mapper,
        connection_id,
        &options,
        Some(&callback),
    )
    .await?;

    print_errors(&report);
    Ok(())
}

pub(crate) async fn repositories(
    settings: &Settings,
    connection_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (github, graph, mapper) = clients(settings)?;
    let callback = progress::progress_callback();

    let report =
        ingest::push_repositories(&github, &graph, &mapper, connection_id, Some(&callback)).await?;

    print_errors(&report);
    Ok(())
}

fn print_errors(report: &PushReport) {
    if report.errors.is_empty() {
        return;
    }
    println!();
    println!("{}", style("Recorded errors:").red());
    for error in &report.errors {
        println!("  - {error}");
    }
}
