//! Contract Test: Loop Lifecycle
//!
//! Constraints verified:
//! - The loop sleeps exactly the configured interval between cycles
//! - Any cycle error terminates the loop (no retry) and is returned
//! - The watchdog branch never wins against the sleep branch
//! - A shutdown signal stops the loop cleanly between cycles
//!
//! Time is paused, so the intervals below cost nothing to wait for.

mod common;

use common::*;
use ifddns_core::{DdnsEngine, EngineEvent, Error};
use std::time::Duration;
use tokio::time::Instant;

const GLOBAL_V6: &str = "2001:db8::10";

#[tokio::test(start_paused = true)]
async fn cycle_error_terminates_loop() {
    let ip_source = ScriptedIpSource::new([
        Lookup::Body("1.2.3.4".to_string()),
        Lookup::TransportError,
    ]);
    let interfaces = StaticInterfaces::new("eth0", &[GLOBAL_V6]);
    let provider = MockDnsProvider::new();
    let (engine, mut event_rx) = engine_with(&ip_source, &interfaces, &provider);

    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let result = engine
        .run_with_shutdown(initial_state("1000"), Some(shutdown_rx))
        .await;

    assert!(matches!(result, Err(Error::IpSource(_))), "got {:?}", result);
    assert_eq!(ip_source.call_count(), 2, "no retry after the failing lookup");
    assert_eq!(provider.call_count(), 2);

    let events = drain_events(&mut event_rx);
    assert_eq!(
        events.first(),
        Some(&EngineEvent::Started {
            interface: "eth0".to_string()
        })
    );
    assert_eq!(
        events.last(),
        Some(&EngineEvent::Stopped {
            reason: "Cycle error".to_string()
        })
    );
    assert!(
        events
            .iter()
            .any(|e| matches!(e, EngineEvent::CycleFailed { .. }))
    );
}

#[tokio::test(start_paused = true)]
async fn loop_waits_configured_interval_and_watchdog_never_fires() {
    let ip_source = ScriptedIpSource::new([
        Lookup::Body("1.2.3.4".to_string()),
        Lookup::Body("1.2.3.4".to_string()),
        Lookup::Body("1.2.3.4".to_string()),
        Lookup::TransportError,
    ]);
    let interfaces = StaticInterfaces::new("eth0", &[GLOBAL_V6]);
    let provider = MockDnsProvider::new();
    let (engine, _event_rx) = engine_with(&ip_source, &interfaces, &provider);

    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let started = Instant::now();
    let result = engine
        .run_with_shutdown(initial_state("2500"), Some(shutdown_rx))
        .await;
    let elapsed = started.elapsed();

    assert!(
        matches!(result, Err(Error::IpSource(_))),
        "loop must end on the lookup error, not the watchdog: {:?}",
        result
    );
    assert_eq!(ip_source.call_count(), 4);
    assert!(elapsed >= Duration::from_millis(3 * 2500), "elapsed {:?}", elapsed);
    assert!(
        elapsed < Duration::from_millis(3 * 2500 + 60_000),
        "elapsed {:?}",
        elapsed
    );
    assert_eq!(provider.call_count(), 2, "only the first cycle pushes");
}

#[tokio::test(start_paused = true)]
async fn shutdown_signal_stops_loop_between_cycles() {
    let ip_source = ScriptedIpSource::fixed("1.2.3.4");
    let interfaces = StaticInterfaces::new("eth0", &[GLOBAL_V6]);
    let provider = MockDnsProvider::new();
    let (engine, mut event_rx) = engine_with(&ip_source, &interfaces, &provider);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle = tokio::spawn(async move {
        engine
            .run_with_shutdown(initial_state("300000"), Some(shutdown_rx))
            .await
    });

    // First cycle completes before virtual time advances.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(ip_source.call_count(), 1);

    shutdown_tx.send(()).expect("engine still listening");

    let result = tokio::time::timeout(Duration::from_secs(5), engine_handle)
        .await
        .expect("engine terminates promptly")
        .expect("engine task does not panic");
    assert!(result.is_ok(), "clean shutdown: {:?}", result);

    assert_eq!(ip_source.call_count(), 1);
    assert_eq!(provider.call_count(), 2);
    let events = drain_events(&mut event_rx);
    assert_eq!(
        events.last(),
        Some(&EngineEvent::Stopped {
            reason: "Shutdown signal".to_string()
        })
    );
}

#[test]
fn zero_event_capacity_rejected() {
    let ip_source = ScriptedIpSource::fixed("1.2.3.4");
    let interfaces = StaticInterfaces::new("eth0", &[]);
    let provider = MockDnsProvider::new();

    let result = DdnsEngine::new(
        Box::new(ip_source),
        Box::new(interfaces),
        Box::new(provider),
        0,
    );
    assert!(matches!(result, Err(Error::Config(_))));
}
