//! Reconnection-cycle tests against a scripted broker link.
//!
//! All timing runs under tokio's paused clock, so the five-second retry
//! delays elapse virtually.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use vrgadget::testing::mocks::{MockLink, MockNetwork};
use vrgadget::transport::{ConnectionState, MqttTransport, TransportError};

const TOPIC: &str = "VRGadget/command";

fn transport(link: MockLink, associated: bool) -> MqttTransport<MockLink> {
    MqttTransport::new(link, TOPIC, Arc::new(MockNetwork { associated }))
}

#[tokio::test(start_paused = true)]
async fn unreachable_broker_gets_exactly_five_attempts() {
    let link = MockLink::rejecting();
    let mut transport = transport(link.clone(), true);

    let started = Instant::now();
    let result = transport.start().await;

    assert!(matches!(
        result,
        Err(TransportError::RetriesExhausted { attempts: 5 })
    ));
    assert_eq!(link.connect_attempts(), 5);
    assert!(transport.has_given_up());
    assert!(link.subscriptions().is_empty());
    // Five attempts, five second wait after each.
    assert_eq!(started.elapsed(), Duration::from_secs(25));
}

#[tokio::test(start_paused = true)]
async fn connect_succeeds_after_transient_failures() {
    let link = MockLink::rejecting_first(2);
    let mut transport = transport(link.clone(), true);

    transport.start().await.unwrap();

    assert_eq!(link.connect_attempts(), 3);
    assert!(transport.is_connected());
    assert_eq!(link.subscriptions(), vec![TOPIC.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn no_attempt_without_network_association() {
    let link = MockLink::accepting();
    let mut transport = transport(link.clone(), false);

    let result = transport.start().await;

    assert!(matches!(result, Err(TransportError::NetworkNotReady)));
    assert_eq!(link.connect_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn service_tick_paces_attempts_by_retry_delay() {
    let link = MockLink::rejecting();
    let mut transport = transport(link.clone(), true);

    // First tick attempts immediately from the disconnected state.
    transport.service_tick().await;
    assert_eq!(link.connect_attempts(), 1);

    // Before the delay elapses, ticks do nothing.
    transport.service_tick().await;
    transport.service_tick().await;
    assert_eq!(link.connect_attempts(), 1);

    tokio::time::advance(Duration::from_secs(5)).await;
    transport.service_tick().await;
    assert_eq!(link.connect_attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn ticks_stop_attempting_after_giving_up() {
    let link = MockLink::rejecting();
    let mut transport = transport(link.clone(), true);

    for _ in 0..6 {
        transport.service_tick().await;
        tokio::time::advance(Duration::from_secs(5)).await;
    }
    assert_eq!(link.connect_attempts(), 5);
    assert_eq!(transport.connection_state(), ConnectionState::GivenUp);

    // Further ticks never touch the link again.
    for _ in 0..10 {
        transport.service_tick().await;
        tokio::time::advance(Duration::from_secs(5)).await;
    }
    assert_eq!(link.connect_attempts(), 5);
}

#[tokio::test(start_paused = true)]
async fn publish_while_disconnected_is_dropped() {
    let link = MockLink::rejecting();
    let mut transport = transport(link.clone(), true);

    transport.publish("VRGadget/status", b"hello").await;

    assert!(link.published().is_empty());
}

#[tokio::test(start_paused = true)]
async fn session_loss_reenters_retry_cycle() {
    let link = MockLink::accepting();
    let mut transport = transport(link.clone(), true);
    transport.start().await.unwrap();
    assert_eq!(link.connect_attempts(), 1);

    link.queue_disconnect();
    transport.service_tick().await;
    assert_eq!(transport.connection_state(), ConnectionState::Disconnected);

    // Next attempt is held back by the retry delay, then reconnects and
    // resubscribes.
    transport.service_tick().await;
    assert_eq!(link.connect_attempts(), 1);
    tokio::time::advance(Duration::from_secs(5)).await;
    transport.service_tick().await;
    assert_eq!(link.connect_attempts(), 2);
    assert!(transport.is_connected());
    assert_eq!(link.subscriptions().len(), 2);
}
