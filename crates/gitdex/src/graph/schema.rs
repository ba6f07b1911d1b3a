//! Static schema catalogs for the supported entity kinds.

use super::types::{
    ActivitySettings, ItemIdResolver, PropertyLabel, PropertyType, Schema, SchemaProperty,
    UrlMatchInfo,
};

/// The entity kinds this connector indexes. Each kind gets its own
/// connection, schema, and resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Issues,
    Repositories,
}

impl ItemType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Issues => "issues",
            ItemType::Repositories => "repositories",
        }
    }

    #[must_use]
    pub fn schema(self) -> Schema {
        match self {
            ItemType::Issues => issues_schema(),
            ItemType::Repositories => repositories_schema(),
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn property(name: &str, property_type: PropertyType) -> SchemaProperty {
    SchemaProperty {
        name: name.to_string(),
        property_type,
        is_searchable: false,
        is_queryable: false,
        is_retrievable: false,
        is_refinable: false,
        labels: Vec::new(),
        aliases: Vec::new(),
    }
}

/// Schema for issue items.
///
/// Refinable properties are never searchable; the service rejects schemas
/// that combine the two facets.
#[must_use]
pub fn issues_schema() -> Schema {
    Schema {
        base_type: Schema::BASE_TYPE.to_string(),
        properties: vec![
            SchemaProperty {
                is_searchable: true,
                is_retrievable: true,
                labels: vec![PropertyLabel::Title],
                ..property("title", PropertyType::String)
            },
            SchemaProperty {
                is_searchable: true,
                is_retrievable: true,
                ..property("body", PropertyType::String)
            },
            SchemaProperty {
                is_queryable: true,
                is_retrievable: true,
                ..property("assignees", PropertyType::String)
            },
            SchemaProperty {
                is_searchable: true,
                is_retrievable: true,
                ..property("labels", PropertyType::String)
            },
            SchemaProperty {
                is_queryable: true,
                is_retrievable: true,
                is_refinable: true,
                ..property("state", PropertyType::String)
            },
            SchemaProperty {
                is_queryable: true,
                is_retrievable: true,
                ..property("issueNumber", PropertyType::String)
            },
            SchemaProperty {
                is_retrievable: true,
                labels: vec![PropertyLabel::Url],
                ..property("url", PropertyType::String)
            },
            SchemaProperty {
                is_retrievable: true,
                labels: vec![PropertyLabel::IconUrl],
                ..property("icon", PropertyType::String)
            },
            SchemaProperty {
                is_queryable: true,
                is_retrievable: true,
                is_refinable: true,
                labels: vec![PropertyLabel::LastModifiedDateTime],
                ..property("updatedAt", PropertyType::DateTime)
            },
            SchemaProperty {
                is_retrievable: true,
                labels: vec![PropertyLabel::CreatedBy],
                ..property("createdBy", PropertyType::String)
            },
            SchemaProperty {
                is_retrievable: true,
                labels: vec![PropertyLabel::LastModifiedBy],
                ..property("lastModifiedBy", PropertyType::String)
            },
        ],
    }
}

/// Schema for repository items, same facet and label discipline as issues.
#[must_use]
pub fn repositories_schema() -> Schema {
    Schema {
        base_type: Schema::BASE_TYPE.to_string(),
        properties: vec![
            SchemaProperty {
                is_searchable: true,
                is_retrievable: true,
                labels: vec![PropertyLabel::Title],
                ..property("name", PropertyType::String)
            },
            SchemaProperty {
                is_searchable: true,
                is_retrievable: true,
                ..property("description", PropertyType::String)
            },
            SchemaProperty {
                is_queryable: true,
                is_retrievable: true,
                is_refinable: true,
                ..property("visibility", PropertyType::String)
            },
            SchemaProperty {
                is_retrievable: true,
                labels: vec![PropertyLabel::Url],
                ..property("url", PropertyType::String)
            },
            SchemaProperty {
                is_retrievable: true,
                labels: vec![PropertyLabel::IconUrl],
                ..property("icon", PropertyType::String)
            },
            SchemaProperty {
                is_queryable: true,
                is_retrievable: true,
                is_refinable: true,
                labels: vec![PropertyLabel::LastModifiedDateTime],
                ..property("updatedAt", PropertyType::DateTime)
            },
            SchemaProperty {
                is_retrievable: true,
                labels: vec![PropertyLabel::CreatedBy],
                ..property("createdBy", PropertyType::String)
            },
            SchemaProperty {
                is_retrievable: true,
                labels: vec![PropertyLabel::LastModifiedBy],
                ..property("lastModifiedBy", PropertyType::String)
            },
        ],
    }
}

/// Activity settings mapping shared GitHub URLs back to item ids.
///
/// Issue URLs resolve to the issue number through a named capture group;
/// repository URLs capture owner and name and join them into the fixed
/// repository item id.
#[must_use]
pub fn resolver_for(item_type: ItemType, owner: &str, repo: &str) -> ActivitySettings {
    let resolver = match item_type {
        ItemType::Issues => ItemIdResolver {
            odata_type: ItemIdResolver::ODATA_TYPE.to_string(),
            url_match_info: UrlMatchInfo {
                base_urls: vec!["https://github.com".to_string()],
                url_pattern: format!("/{owner}/{repo}/issues/(?<issueId>[0-9]+)"),
            },
            item_id: "{issueId}".to_string(),
            priority: 1,
        },
        ItemType::Repositories => ItemIdResolver {
            odata_type: ItemIdResolver::ODATA_TYPE.to_string(),
            url_match_info: UrlMatchInfo {
                base_urls: vec!["https://github.com".to_string()],
                url_pattern: "/(?<repoOwner>[^/]+)/(?<repoName>[^/]+)/?$".to_string(),
            },
            item_id: "{repoOwner}-{repoName}".to_string(),
            priority: 1,
        },
    };
    ActivitySettings {
        url_to_item_resolvers: vec![resolver],
    }
}
