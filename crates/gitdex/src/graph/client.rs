//! Graph connector API client.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

use super::error::GraphError;
use super::types::{
    ActivitySettings, ExternalActivity, ExternalConnection, ExternalItem, Operation, Schema,
};

/// Allowed length range for connection ids.
const CONNECTION_ID_MIN: usize = 3;
const CONNECTION_ID_MAX: usize = 32;

/// Client for the Graph external-connection API.
///
/// Like [`crate::github::GitHubClient`], all I/O goes through the
/// [`HttpTransport`] seam.
#[derive(Clone)]
pub struct GraphClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    token: String,
}

/// Pointer to a pending server-side operation, obtained when a schema is
/// submitted. Poll it with [`GraphClient::get_operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    pub connection_id: String,
    pub operation_id: String,
}

impl GraphClient {
    /// Create a client with a real HTTP transport.
    pub fn new(host: &str, token: &str) -> Result<Self, GraphError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| GraphError::transport(e.to_string()))?;
        Ok(Self::with_transport(host, token, Arc::new(transport)))
    }

    pub fn with_transport(host: &str, token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn request_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
        ]
    }

    /// Send a request with an optional JSON body and return the raw response.
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> Result<HttpResponse, GraphError> {
        let body = match body {
            Some(value) => serde_json::to_vec(value)?,
            None => Vec::new(),
        };

        let request = HttpRequest {
            method,
            url: format!("{}{}", self.host, path),
            headers: self.request_headers(),
            body,
        };

        self.transport
            .send(request)
            .await
            .map_err(|e| GraphError::transport(e.to_string()))
    }

    /// Send a request and fail on any non-2xx status.
    async fn send_checked(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> Result<HttpResponse, GraphError> {
        let response = self.send(method, path, body).await?;
        if (200..300).contains(&response.status) {
            Ok(response)
        } else {
            Err(GraphError::from_response(response.status, &response.body))
        }
    }

    /// Create a connection. The id must be 3-32 characters and the display
    /// name non-empty; both are checked before any request is made.
    pub async fn create_connection(
        &self,
        connection: &ExternalConnection,
    ) -> Result<ExternalConnection, GraphError> {
        validate_connection_id(&connection.id)?;
        if connection.name.trim().is_empty() {
            return Err(GraphError::validation("connection name must not be empty"));
        }

        let response = self
            .send_checked(HttpMethod::Post, "/external/connections", Some(connection))
            .await?;
        serde_json::from_slice(&response.body).map_err(GraphError::Json)
    }

    /// List all connections in the tenant.
    pub async fn list_connections(&self) -> Result<Vec<ExternalConnection>, GraphError> {
        #[derive(serde::Deserialize)]
        struct Collection {
            value: Vec<ExternalConnection>,
        }

        let response = self
            .send_checked(
                HttpMethod::Get,
                "/external/connections",
                None::<&ExternalConnection>,
            )
            .await?;
        let collection: Collection = serde_json::from_slice(&response.body)?;
        Ok(collection.value)
    }

    /// Delete a connection and everything indexed under it.
    pub async fn delete_connection(&self, connection_id: &str) -> Result<(), GraphError> {
        validate_connection_id(connection_id)?;
        self.send_checked(
            HttpMethod::Delete,
            &format!("/external/connections/{connection_id}"),
            None::<&ExternalConnection>,
        )
        .await?;
        Ok(())
    }

    /// Attach URL-to-item resolvers to an existing connection.
    pub async fn add_activity_settings(
        &self,
        connection_id: &str,
        settings: &ActivitySettings,
    ) -> Result<(), GraphError> {
        validate_connection_id(connection_id)?;

        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Patch<'a> {
            activity_settings: &'a ActivitySettings,
        }

        self.send_checked(
            HttpMethod::Patch,
            &format!("/external/connections/{connection_id}"),
            Some(&Patch {
                activity_settings: settings,
            }),
        )
        .await?;
        Ok(())
    }

    /// Submit a schema for registration.
    ///
    /// Registration is asynchronous: the service accepts the schema and
    /// returns a `Location` header pointing at an operation to poll. A 2xx
    /// response without that header is treated as a transport error.
    pub async fn put_schema(
        &self,
        connection_id: &str,
        schema: &Schema,
    ) -> Result<OperationHandle, GraphError> {
        validate_connection_id(connection_id)?;

        let mut headers = self.request_headers();
        headers.push(("Prefer".to_string(), "respond-async".to_string()));
        let request = HttpRequest {
            method: HttpMethod::Put,
            url: format!(
                "{}/external/connections/{connection_id}/schema",
                self.host
            ),
            headers,
            body: serde_json::to_vec(schema)?,
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| GraphError::transport(e.to_string()))?;
        if !(200..300).contains(&response.status) {
            return Err(GraphError::from_response(response.status, &response.body));
        }

        let location = response.header("location").ok_or_else(|| {
            GraphError::transport("schema submit response missing Location header")
        })?;
        let operation_id = location
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                GraphError::transport(format!("unparseable operation location: {location}"))
            })?;

        Ok(OperationHandle {
            connection_id: connection_id.to_string(),
            operation_id: operation_id.to_string(),
        })
    }

    /// Read the current state of a pending operation.
    pub async fn get_operation(&self, handle: &OperationHandle) -> Result<Operation, GraphError> {
        let response = self
            .send_checked(
                HttpMethod::Get,
                &format!(
                    "/external/connections/{}/operations/{}",
                    handle.connection_id, handle.operation_id
                ),
                None::<&Schema>,
            )
            .await?;
        serde_json::from_slice(&response.body).map_err(GraphError::Json)
    }

    /// Upsert one item. Re-submitting the same id overwrites the stored item.
    pub async fn put_item(
        &self,
        connection_id: &str,
        item_id: &str,
        item: &ExternalItem,
    ) -> Result<(), GraphError> {
        validate_connection_id(connection_id)?;
        if item_id.trim().is_empty() {
            return Err(GraphError::validation("item id must not be empty"));
        }

        self.send_checked(
            HttpMethod::Put,
            &format!("/external/connections/{connection_id}/items/{item_id}"),
            Some(item),
        )
        .await?;
        Ok(())
    }

    /// Append activities to an item's feed.
    ///
    /// An empty batch is a no-op: the call succeeds without touching the
    /// network, so callers can pass whatever the mapper produced.
    pub async fn add_activities(
        &self,
        connection_id: &str,
        item_id: &str,
        activities: &[ExternalActivity],
    ) -> Result<(), GraphError> {
        if activities.is_empty() {
            return Ok(());
        }

        validate_connection_id(connection_id)?;

        #[derive(serde::Serialize)]
        struct Batch<'a> {
            activities: &'a [ExternalActivity],
        }

        self.send_checked(
            HttpMethod::Post,
            &format!("/external/connections/{connection_id}/items/{item_id}/addActivities"),
            Some(&Batch { activities }),
        )
        .await?;
        Ok(())
    }
}

fn validate_connection_id(id: &str) -> Result<(), GraphError> {
    let len = id.chars().count();
    if !(CONNECTION_ID_MIN..=CONNECTION_ID_MAX).contains(&len) {
        return Err(GraphError::validation(format!(
            "connection id must be {CONNECTION_ID_MIN}-{CONNECTION_ID_MAX} characters, got {len}"
        )));
    }
    Ok(())
}
