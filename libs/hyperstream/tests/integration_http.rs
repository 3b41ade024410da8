//! End-to-end tests against a local SSE server over real HTTP

mod common;

use common::*;
use hyperstream::*;
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn http_client(url: &str, strategy: impl ReconnectionStrategy + 'static) -> EventStreamClient<TestDecoder> {
    hyperstream::builder()
        .url(url)
        .decoder(TestDecoder)
        .headers(Arc::new(BearerToken::new("test-token")))
        .connect_timeout(Duration::from_secs(2))
        .reconnect_strategy(strategy)
        .build()
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_receives_events_over_http() {
    let server = MockSseServer::start().await;
    let client = http_client(&server.url(), NeverReconnect);
    let (handler, seen) = recording_handler();
    client.on_event(handler);

    client.connect();
    assert!(wait_for(WAIT, || client.is_connected()).await);

    server.send(frame("score", "Flamengo 2-1 Grêmio"));
    server.send("event: ping\ndata: tick|1\n\n");
    assert!(wait_for(WAIT, || seen.lock().len() == 2).await);

    let seen = seen.lock().clone();
    verbose_println!("received: {:?}", seen);
    assert_eq!(seen[0].payload, "Flamengo 2-1 Grêmio");
    assert_eq!(seen[1].kind, "tick");
    assert_eq!(server.connection_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_drop_reconnects_with_last_event_id() {
    let server = MockSseServer::start().await;
    let client = http_client(
        &server.url(),
        FixedDelay::new(Duration::from_millis(100), Some(5)),
    );
    let (handler, seen) = recording_handler();
    client.on_event(handler);

    client.connect();
    assert!(wait_for(WAIT, || client.is_connected()).await);

    server.send(frame_with_id("42", "tick", "before"));
    assert!(wait_for(WAIT, || seen.lock().len() == 1).await);
    tokio::time::sleep(Duration::from_millis(50)).await;

    server.drop_connections();
    assert!(wait_for(WAIT, || server.connection_count() == 2 && client.is_connected()).await);

    let ids = server.last_event_ids();
    assert_eq!(ids[0], None);
    assert_eq!(ids[1].as_deref(), Some("42"));

    server.send(frame("tick", "after"));
    assert!(wait_for(WAIT, || seen.lock().len() == 2).await);
    assert_eq!(client.reconnect_attempts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_http_error_status_is_retried_then_abandoned() {
    let server = MockSseServer::start_with_status(503).await;
    let client = http_client(
        &server.url(),
        FixedDelay::new(Duration::from_millis(50), Some(2)),
    );

    client.connect();
    assert!(wait_for(WAIT, || server.connection_count() == 3
        && client.connection_state() == ConnectionState::Disconnected)
    .await);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.connection_count(), 3);

    let events = client.drain_events();
    assert!(events.contains(&ClientEvent::Error("HTTP 503: unavailable".into())));
    assert_eq!(events.last(), Some(&ClientEvent::RetriesExhausted(2)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_refused_connection_reports_transport_error() {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = http_client(&format!("http://{}/api/matches/events", addr), NeverReconnect);

    client.connect();
    assert!(wait_for(WAIT, || client.reconnect_attempts() == 0
        && client.connection_state() == ConnectionState::Disconnected
        && client.metrics().frames_received == 0)
    .await);

    let event = client.recv_event_timeout(WAIT);
    assert!(matches!(event, Some(ClientEvent::Error(ref msg)) if msg.starts_with("Transport error")));
}
