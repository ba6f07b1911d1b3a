//! Graph connector API error types.

use thiserror::Error;

/// Errors that can occur when talking to the Graph connector API.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Non-success response from the remote service.
    #[error("Graph API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Bad caller input caught before any request is made.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable response received: transport failure or a response missing
    /// a required header (e.g., the operation Location on schema submit).
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed response body.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Build an `Api` error from a response status and raw body.
    ///
    /// Graph error bodies look like `{"error":{"code":"...","message":"..."}}`;
    /// anything else is carried verbatim as the message.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: ErrorDetail,
        }
        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            #[serde(default)]
            code: String,
            #[serde(default)]
            message: String,
        }

        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => Self::Api {
                status,
                code: parsed.error.code,
                message: parsed.error.message,
            },
            Err(_) => Self::Api {
                status,
                code: String::new(),
                message: String::from_utf8_lossy(body).to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_response_parses_graph_error_body() {
        let body = br#"{"error":{"code":"ItemNotFound","message":"Connection not found"}}"#;
        match GraphError::from_response(404, body) {
            GraphError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "ItemNotFound");
                assert_eq!(message, "Connection not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_response_falls_back_to_raw_body() {
        match GraphError::from_response(500, b"gateway exploded") {
            GraphError::Api { code, message, .. } => {
                assert!(code.is_empty());
                assert_eq!(message, "gateway exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
