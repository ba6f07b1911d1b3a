//! Graph external-connection data types.
//!
//! These mirror the `externalConnectors` wire shapes: camelCase field names
//! and `@odata.type` discriminators where the API requires them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An external connection resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalConnection {
    /// Caller-supplied id, 3-32 chars, immutable after creation.
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_settings: Option<ActivitySettings>,
}

/// URL-to-item resolution settings attached to a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySettings {
    pub url_to_item_resolvers: Vec<ItemIdResolver>,
}

/// Resolves a shared URL to an item id via a regex with named groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemIdResolver {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub url_match_info: UrlMatchInfo,
    /// Item id template referencing named capture groups, e.g. `{issueId}`.
    pub item_id: String,
    pub priority: u32,
}

impl ItemIdResolver {
    pub const ODATA_TYPE: &'static str = "#microsoft.graph.externalConnectors.itemIdResolver";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMatchInfo {
    pub base_urls: Vec<String>,
    pub url_pattern: String,
}

/// A registered schema: an ordered set of typed, faceted properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub base_type: String,
    pub properties: Vec<SchemaProperty>,
}

impl Schema {
    pub const BASE_TYPE: &'static str = "microsoft.graph.externalItem";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub is_searchable: bool,
    pub is_queryable: bool,
    pub is_retrievable: bool,
    pub is_refinable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub labels: Vec<PropertyLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    String,
    DateTime,
}

/// Semantic labels the search platform understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyLabel {
    Title,
    Url,
    IconUrl,
    LastModifiedBy,
    LastModifiedDateTime,
    CreatedBy,
    CreatedDateTime,
}

/// One indexed document within a connection.
///
/// The id lives in the request URL, not the payload; properties use a
/// sorted map so serializing the same item twice is byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalItem {
    pub acl: Vec<Acl>,
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ItemContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acl {
    #[serde(rename = "type")]
    pub acl_type: String,
    pub value: String,
    pub access_type: String,
}

impl Acl {
    /// Grant read access to everyone in the tenant.
    pub fn everyone() -> Self {
        Self {
            acl_type: "everyone".to_string(),
            value: "everyone".to_string(),
            access_type: "grant".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
    #[serde(rename = "type")]
    pub content_type: ItemContentType,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemContentType {
    Html,
    Text,
}

/// One timeline entry in an item's conversation feed.
///
/// Activities are additive: submitting a batch appends, it never replaces
/// previously submitted activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalActivity {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub started_date_time: DateTime<Utc>,
    pub performed_by: ActivityPerformer,
}

impl ExternalActivity {
    pub const ODATA_TYPE: &'static str = "#microsoft.graph.externalConnectors.externalActivity";

    pub fn new(
        activity_type: ActivityType,
        started_date_time: DateTime<Utc>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            odata_type: Self::ODATA_TYPE.to_string(),
            activity_type,
            started_date_time,
            performed_by: ActivityPerformer {
                performer_type: "user".to_string(),
                id: user_id.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    Created,
    Commented,
    Closed,
    Reopened,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPerformer {
    #[serde(rename = "type")]
    pub performer_type: String,
    pub id: String,
}

/// Server-side handle for an asynchronous operation (schema registration).
///
/// Transient: the client discards it once a terminal status is observed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    pub status: OperationStatus,
    #[serde(default)]
    pub error: Option<OperationError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    Unspecified,
    NotStarted,
    #[serde(alias = "inProgress")]
    Inprogress,
    Completed,
    Failed,
}

impl OperationStatus {
    /// Whether this status ends the polling loop.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, OperationStatus::Completed | OperationStatus::Failed)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    #[serde(default)]
    pub message: String,
}
