//! Integration tests for reconnection strategies
//!
//! These tests verify the delay sequences and budgets of each strategy,
//! and that the client honours a non-default strategy.

mod common;

use common::*;
use hyperstream::traits::reconnect::{
    ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectionStrategy,
};
use hyperstream::{ClientEvent, ConnectionState, Transport};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_default_policy_is_three_seconds_five_attempts() {
    verbose_println!("Testing default fixed delay policy...");

    let strategy = FixedDelay::default();

    for attempt in 0..5 {
        assert_eq!(strategy.next_delay(attempt), Some(Duration::from_secs(3)));
    }
    assert!(strategy.next_delay(5).is_none());
    assert_eq!(strategy.max_attempts(), Some(5));
}

#[test]
fn test_exponential_backoff_full_sequence() {
    verbose_println!("Testing exponential backoff full sequence...");

    let strategy = ExponentialBackoff::new(
        Duration::from_millis(100),
        Duration::from_secs(10),
        Some(5),
    );

    let expected_delays = [100, 200, 400, 800, 1600];

    for (attempt, &expected_ms) in expected_delays.iter().enumerate() {
        let delay = strategy.next_delay(attempt).unwrap();
        verbose_println!("  Attempt {}: {:?}", attempt, delay);
        assert_eq!(
            delay.as_millis(),
            expected_ms,
            "Unexpected delay at attempt {}",
            attempt
        );
    }

    assert!(
        strategy.next_delay(5).is_none(),
        "Should return None after max attempts"
    );
}

#[test]
fn test_exponential_backoff_with_capping() {
    let strategy = ExponentialBackoff::new(Duration::from_millis(500), Duration::from_secs(2), None);

    let delays: Vec<u64> = (0..6)
        .map(|i| strategy.next_delay(i).unwrap().as_millis() as u64)
        .collect();

    verbose_println!("  Delays: {:?}", delays);
    assert_eq!(delays, vec![500, 1000, 2000, 2000, 2000, 2000]);
}

#[test]
fn test_exponential_backoff_overflow_safety() {
    let strategy = ExponentialBackoff::new(
        Duration::from_millis(100),
        Duration::from_secs(3600),
        None,
    );

    assert!(strategy.next_delay(30).unwrap() <= Duration::from_secs(3600));
    let _ = strategy.next_delay(100);
    let _ = strategy.next_delay(usize::MAX);
}

#[test]
fn test_fixed_delay_unlimited() {
    let strategy = FixedDelay::new(Duration::from_millis(750), None);

    for attempt in 0..100 {
        assert_eq!(strategy.next_delay(attempt), Some(Duration::from_millis(750)));
    }
    assert_eq!(strategy.max_attempts(), None);
}

#[test]
fn test_never_reconnect_always_fails() {
    let strategy = NeverReconnect;

    for attempt in 0..10 {
        assert!(strategy.next_delay(attempt).is_none());
        assert!(!strategy.should_reconnect(attempt));
    }
}

#[tokio::test(start_paused = true)]
async fn test_client_with_never_reconnect_gives_up_immediately() {
    let transport = ScriptedTransport::new();
    let client = hyperstream::builder()
        .url(TEST_URL)
        .decoder(TestDecoder)
        .transport(Arc::clone(&transport) as Arc<dyn Transport>)
        .reconnect_strategy(NeverReconnect)
        .build()
        .unwrap();

    client.connect();
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(transport.open_count(), 1);
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert_eq!(
        client.drain_events().last(),
        Some(&ClientEvent::RetriesExhausted(0))
    );
}

#[tokio::test(start_paused = true)]
async fn test_client_follows_exponential_schedule() {
    let transport = ScriptedTransport::new();
    let client = hyperstream::builder()
        .url(TEST_URL)
        .decoder(TestDecoder)
        .transport(Arc::clone(&transport) as Arc<dyn Transport>)
        .reconnect_strategy(ExponentialBackoff::new(
            Duration::from_secs(1),
            Duration::from_secs(60),
            Some(3),
        ))
        .build()
        .unwrap();

    client.connect();
    settle().await;
    assert_eq!(transport.open_count(), 1);

    // retries at +1s, +2s, +4s
    tokio::time::sleep(Duration::from_millis(1010)).await;
    assert_eq!(transport.open_count(), 2);

    tokio::time::sleep(Duration::from_millis(2010)).await;
    assert_eq!(transport.open_count(), 3);

    tokio::time::sleep(Duration::from_millis(4010)).await;
    assert_eq!(transport.open_count(), 4);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.open_count(), 4);
    assert_eq!(client.reconnect_attempts(), 3);
}
