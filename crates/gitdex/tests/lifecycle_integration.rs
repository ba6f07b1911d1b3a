//! Integration tests for the connection lifecycle and schema registration.
//!
//! These run the real client and polling loop end to end against a scripted
//! transport, and guard every await with a timeout so a regression that
//! turns the poll loop into a hang or a spin fails fast instead of wedging
//! the test runner.
//!
//! Key scenarios tested:
//! - Create followed by list returns the created connection unchanged
//! - Delete followed by list never returns the deleted id
//! - Registration polls an operation to completion within the deadline
//! - A never-completing operation times out, and reports timeout not failure
//! - Cancellation interrupts an in-flight inter-poll sleep promptly

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::ScriptedTransport;
use gitdex::graph::{
    ExternalConnection, GraphClient, ItemType, RegistrationError, RegistrationOptions,
    register_schema, resolver_for,
};
use gitdex::http::{HttpMethod, HttpResponse};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Maximum time any lifecycle operation should take in tests.
/// If exceeded, there's likely a hang or a spin loop.
const OP_TIMEOUT: Duration = Duration::from_secs(10);

/// Tighter bound for operations that should return almost immediately.
const FAST_TIMEOUT: Duration = Duration::from_secs(2);

const HOST: &str = "https://graph.test/v1.0";
const CONNECTION: &str = "gitdexissues";

fn client(transport: &ScriptedTransport) -> GraphClient {
    GraphClient::with_transport(HOST, "token", Arc::new(transport.clone()))
}

fn connections_url() -> String {
    format!("{HOST}/external/connections")
}

fn operation_url(operation_id: &str) -> String {
    format!("{HOST}/external/connections/{CONNECTION}/operations/{operation_id}")
}

fn stub_schema_accepted(transport: &ScriptedTransport, operation_id: &str) {
    transport.stub(
        HttpMethod::Put,
        format!("{HOST}/external/connections/{CONNECTION}/schema"),
        HttpResponse {
            status: 202,
            headers: vec![("Location".to_string(), operation_url(operation_id))],
            body: Vec::new(),
        },
    );
}

#[tokio::test]
async fn create_then_list_returns_the_connection_unchanged() {
    let transport = ScriptedTransport::new();
    transport.stub_json(
        HttpMethod::Post,
        connections_url(),
        r#"{"id":"gitdexissues","name":"GitHub Issues","description":"acme/widgets issues"}"#,
    );
    transport.stub_json(
        HttpMethod::Get,
        connections_url(),
        r#"{"value":[{"id":"gitdexissues","name":"GitHub Issues","description":"acme/widgets issues"}]}"#,
    );

    let client = client(&transport);
    let connection = ExternalConnection {
        id: CONNECTION.to_string(),
        name: "GitHub Issues".to_string(),
        description: Some("acme/widgets issues".to_string()),
        activity_settings: Some(resolver_for(ItemType::Issues, "acme", "widgets")),
    };

    let created = timeout(OP_TIMEOUT, client.create_connection(&connection))
        .await
        .expect("create should not hang")
        .expect("create succeeds");
    let listed = timeout(OP_TIMEOUT, client.list_connections())
        .await
        .expect("list should not hang")
        .expect("list succeeds");

    assert_eq!(created.id, CONNECTION);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].name, "GitHub Issues");
    assert_eq!(listed[0].description.as_deref(), Some("acme/widgets issues"));
}

#[tokio::test]
async fn delete_then_list_never_returns_the_deleted_id() {
    let transport = ScriptedTransport::new();
    transport.stub_status(
        HttpMethod::Delete,
        format!("{HOST}/external/connections/{CONNECTION}"),
        204,
    );
    transport.stub_json(
        HttpMethod::Get,
        connections_url(),
        r#"{"value":[{"id":"gitdexrepos","name":"GitHub Repos"}]}"#,
    );

    let client = client(&transport);
    timeout(OP_TIMEOUT, client.delete_connection(CONNECTION))
        .await
        .expect("delete should not hang")
        .expect("delete succeeds");
    let listed = timeout(OP_TIMEOUT, client.list_connections())
        .await
        .expect("list should not hang")
        .expect("list succeeds");

    assert!(listed.iter().all(|c| c.id != CONNECTION));
}

#[tokio::test]
async fn registration_polls_to_completion_within_the_deadline() {
    let transport = ScriptedTransport::new();
    stub_schema_accepted(&transport, "op-1");
    let url = operation_url("op-1");
    transport.stub_json(HttpMethod::Get, &url, r#"{"id":"op-1","status":"inprogress"}"#);
    transport.stub_json(HttpMethod::Get, &url, r#"{"id":"op-1","status":"inprogress"}"#);
    transport.stub_json(HttpMethod::Get, &url, r#"{"id":"op-1","status":"completed"}"#);

    let client = client(&transport);
    let options = RegistrationOptions {
        poll_interval: Duration::from_millis(20),
        timeout: Duration::from_secs(5),
    };
    let cancel = CancellationToken::new();

    timeout(
        OP_TIMEOUT,
        register_schema(&client, CONNECTION, ItemType::Issues, &options, &cancel),
    )
    .await
    .expect("registration should not hang")
    .expect("registration completes");

    assert_eq!(transport.count(HttpMethod::Get, &url), 3);
}

#[tokio::test]
async fn never_completing_operation_times_out_not_fails() {
    let transport = ScriptedTransport::new();
    stub_schema_accepted(&transport, "op-2");
    let url = operation_url("op-2");
    for _ in 0..100 {
        transport.stub_json(HttpMethod::Get, &url, r#"{"id":"op-2","status":"inprogress"}"#);
    }

    let client = client(&transport);
    let options = RegistrationOptions {
        poll_interval: Duration::from_millis(10),
        timeout: Duration::from_millis(150),
    };
    let cancel = CancellationToken::new();

    let err = timeout(
        FAST_TIMEOUT,
        register_schema(&client, CONNECTION, ItemType::Issues, &options, &cancel),
    )
    .await
    .expect("deadline should stop polling well inside the test timeout")
    .expect_err("registration should time out");

    match err {
        RegistrationError::TimedOut { waited } => assert!(waited >= options.timeout),
        other => panic!("expected TimedOut, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_operation_carries_the_remote_message() {
    let transport = ScriptedTransport::new();
    stub_schema_accepted(&transport, "op-3");
    transport.stub_json(
        HttpMethod::Get,
        operation_url("op-3"),
        r#"{"id":"op-3","status":"failed","error":{"message":"property limit exceeded"}}"#,
    );

    let client = client(&transport);
    let options = RegistrationOptions {
        poll_interval: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    };
    let cancel = CancellationToken::new();

    let err = timeout(
        FAST_TIMEOUT,
        register_schema(&client, CONNECTION, ItemType::Issues, &options, &cancel),
    )
    .await
    .expect("failed operation should return promptly")
    .expect_err("registration should fail");

    match err {
        RegistrationError::Failed { message } => {
            assert_eq!(message, "property limit exceeded");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn cancellation_interrupts_the_inter_poll_sleep() {
    let transport = ScriptedTransport::new();
    stub_schema_accepted(&transport, "op-4");

    let client = client(&transport);
    // A poll interval far longer than the test timeout: only a prompt
    // reaction to the token can end the wait.
    let options = RegistrationOptions {
        poll_interval: Duration::from_secs(60),
        timeout: Duration::from_secs(600),
    };
    let cancel = CancellationToken::new();
    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        })
    };

    let err = timeout(
        FAST_TIMEOUT,
        register_schema(&client, CONNECTION, ItemType::Issues, &options, &cancel),
    )
    .await
    .expect("cancellation should abort the sleep promptly")
    .expect_err("registration should report cancellation");
    canceller.await.expect("canceller task");

    assert!(matches!(err, RegistrationError::Cancelled));
    // Cancelled before the first poll fired.
    assert_eq!(transport.count(HttpMethod::Get, &operation_url("op-4")), 0);
}
