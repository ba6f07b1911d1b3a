//! Shared harness for integration tests.
//!
//! `ScriptedTransport` implements the crate's [`HttpTransport`] seam with
//! canned responses, so end-to-end runs exercise both remote clients without
//! sockets. Responses are keyed by method + URL and served in FIFO order,
//! which lets a test model an operation whose status changes between polls.

// Each test binary uses a different subset of the harness.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gitdex::http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    routes: HashMap<(HttpMethod, String), VecDeque<HttpResponse>>,
    requests: Vec<HttpRequest>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub(&self, method: HttpMethod, url: impl Into<String>, response: HttpResponse) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .routes
            .entry((method, url.into()))
            .or_default()
            .push_back(response);
    }

    pub fn stub_json(&self, method: HttpMethod, url: impl Into<String>, body: &str) {
        self.stub(
            method,
            url,
            HttpResponse {
                status: 200,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: body.as_bytes().to_vec(),
            },
        );
    }

    pub fn stub_status(&self, method: HttpMethod, url: impl Into<String>, status: u16) {
        self.stub(
            method,
            url,
            HttpResponse {
                status,
                headers: Vec::new(),
                body: Vec::new(),
            },
        );
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: HttpMethod, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (request.method, request.url.clone());
        inner.requests.push(request);

        match inner.routes.get_mut(&key).and_then(|q| q.pop_front()) {
            Some(response) => Ok(response),
            None => Err(HttpError::NoMockResponse {
                method: key.0.as_str().to_string(),
                url: key.1,
            }),
        }
    }
}

/// A minimal issue payload as the GitHub API returns it.
pub fn issue_json(number: u64) -> String {
    format!(
        r#"{{
            "number": {number},
            "title": "Issue {number}",
            "body": "body of issue {number}",
            "state": "open",
            "html_url": "https://github.com/acme/widgets/issues/{number}",
            "user": {{"login": "octocat"}},
            "assignees": [{{"login": "alice"}}],
            "labels": [{{"name": "bug"}}],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }}"#
    )
}

/// A minimal repository payload as the GitHub API returns it.
pub fn repo_json(id: i64, private: bool) -> String {
    format!(
        r#"{{
            "id": {id},
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
