//! Microsoft Graph external-connection client.
//!
//! Covers the connection lifecycle (create/list/delete, activity settings),
//! the asynchronous schema registration protocol, and the item/activity
//! upsert surface of the search connector API.

mod client;
mod error;
pub mod registration;
pub mod schema;
mod types;

pub use client::{GraphClient, OperationHandle};
pub use error::GraphError;
pub use registration::{RegistrationError, RegistrationOptions, register_schema};
pub use schema::{ItemType, issues_schema, repositories_schema, resolver_for};
pub use types::{
    Acl, ActivitySettings, ActivityType, ExternalActivity, ExternalConnection, ExternalItem,
    ItemContent, ItemContentType, ItemIdResolver, Operation, OperationStatus, PropertyLabel,
    PropertyType, Schema, SchemaProperty, UrlMatchInfo,
};
