//! Pure mapping from GitHub entities to Graph items and activities.
//!
//! The mapper performs no I/O. Content attachment happens after the
//! pipeline's own fetch, via [`with_html_content`] / [`with_json_content`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use crate::github::{Issue, Repository, TimelineEvent};
use crate::graph::{Acl, ActivityType, ExternalActivity, ExternalItem, ItemContent, ItemContentType};
use crate::identity::IdentityResolver;

/// Icon shown next to every indexed item.
const GITHUB_ICON_URL: &str = "https://github.githubassets.com/favicons/favicon.svg";

/// Maps fetched GitHub entities to Graph payloads.
///
/// Deterministic: the same input always produces the same item, so re-running
/// a push overwrites items with identical content.
#[derive(Clone)]
pub struct Mapper {
    resolver: Arc<dyn IdentityResolver>,
}

impl Mapper {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }

    /// Item id for an issue: its number within the repository.
    #[must_use]
    pub fn issue_item_id(issue: &Issue) -> String {
        issue.number.to_string()
    }

    /// Item id for a repository: its numeric id as a string. Stable across
    /// renames, unlike the full name.
    #[must_use]
    pub fn repository_item_id(repository: &Repository) -> String {
        repository.id.to_string()
    }

    /// Map an issue to an item matching the issues schema, without content.
    #[must_use]
    pub fn issue_item(&self, issue: &Issue) -> ExternalItem {
        let author = self.resolver.resolve(&issue.user.login).user_id;
        let assignees = issue
            .assignees
            .iter()
            .map(|a| a.login.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let labels = issue
            .labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut properties = BTreeMap::new();
        properties.insert("title".to_string(), json!(issue.title));
        properties.insert(
            "body".to_string(),
            json!(issue.body.as_deref().unwrap_or_default()),
        );
        properties.insert("assignees".to_string(), json!(assignees));
        properties.insert("labels".to_string(), json!(labels));
        properties.insert("state".to_string(), json!(issue.state));
        properties.insert("issueNumber".to_string(), json!(issue.number.to_string()));
        properties.insert("url".to_string(), json!(issue.html_url));
        properties.insert("icon".to_string(), json!(GITHUB_ICON_URL));
        properties.insert("updatedAt".to_string(), json!(issue.updated_at));
        properties.insert("createdBy".to_string(), json!(author));
        properties.insert("lastModifiedBy".to_string(), json!(author));

        ExternalItem {
            acl: vec![Acl::everyone()],
            properties,
            content: None,
        }
    }

    /// Map a repository to an item matching the repositories schema.
    #[must_use]
    pub fn repository_item(&self, repository: &Repository) -> ExternalItem {
        let owner = self.resolver.resolve(&repository.owner.login).user_id;
        let visibility = if repository.private {
            "private"
        } else {
            "public"
        };

        let mut properties = BTreeMap::new();
        properties.insert("name".to_string(), json!(repository.name));
        properties.insert(
            "description".to_string(),
            json!(repository.description.as_deref().unwrap_or_default()),
        );
        properties.insert("visibility".to_string(), json!(visibility));
        properties.insert("url".to_string(), json!(repository.html_url));
        properties.insert("icon".to_string(), json!(GITHUB_ICON_URL));
        if let Some(updated_at) = repository.updated_at {
            properties.insert("updatedAt".to_string(), json!(updated_at));
        }
        properties.insert("createdBy".to_string(), json!(owner));
        properties.insert("lastModifiedBy".to_string(), json!(owner));

        ExternalItem {
            acl: vec![Acl::everyone()],
            properties,
            content: None,
        }
    }

    /// Map timeline events to activities, in the order they were fetched.
    ///
    /// Only events that translate to an activity the feed understands are
    /// kept (commented, closed, reopened); everything else is dropped, not
    /// mapped to a placeholder. Events without a timestamp are dropped too.
    #[must_use]
    pub fn issue_activities(&self, events: &[TimelineEvent]) -> Vec<ExternalActivity> {
        events
            .iter()
            .filter_map(|event| {
                let activity_type = match event.event.as_str() {
                    "commented" => ActivityType::Commented,
                    "closed" => ActivityType::Closed,
                    "reopened" => ActivityType::Reopened,
                    _ => return None,
                };
                let started = event.created_at?;
                let login = event
                    .actor
                    .as_ref()
                    .map(|a| a.login.as_str())
                    .unwrap_or_default();
                let identity = self.resolver.resolve(login);
                Some(ExternalActivity::new(
                    activity_type,
                    started,
                    identity.user_id,
                ))
            })
            .collect()
    }
}

/// Attach fetched HTML as the item's content.
#[must_use]
pub fn with_html_content(mut item: ExternalItem, html: String) -> ExternalItem {
    item.content = Some(ItemContent {
        content_type: ItemContentType::Html,
        value: html,
    });
    item
}

/// Attach the entity's JSON representation as text content.
///
/// Used when HTML is unavailable (private entities, fetch failures), so the
/// item still has searchable content.
pub fn with_json_content<T: serde::Serialize>(
    mut item: ExternalItem,
    value: &T,
) -> Result<ExternalItem, serde_json::Error> {
    item.content = Some(ItemContent {
        content_type: ItemContentType::Text,
        value: serde_json::to_string(value)?,
    });
    Ok(item)
}
