//! Test doubles and common utilities for engine contract tests
//!
//! Every double is `Clone` and shares its counters through `Arc`, so a test
//! can hand one clone to the engine and keep another for assertions.

#![allow(dead_code)]

use ifddns_core::config::DdnsConfig;
use ifddns_core::error::{Error, Result};
use ifddns_core::state::{AppState, NetworkInterface};
use ifddns_core::traits::{DnsProvider, InterfaceSource, IpSource, UpdateResult};
use ifddns_core::DdnsEngine;
use ifddns_core::EngineEvent;
use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Scripted reply of [`ScriptedIpSource`]
#[derive(Debug, Clone)]
pub enum Lookup {
    Body(String),
    TransportError,
}

/// An IpSource that replays a script, repeating the last entry forever
#[derive(Clone)]
pub struct ScriptedIpSource {
    script: Arc<Mutex<VecDeque<Lookup>>>,
    last: Arc<Mutex<Option<Lookup>>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    pub fn new(script: impl IntoIterator<Item = Lookup>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            last: Arc::new(Mutex::new(None)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always answer with the same body
    pub fn fixed(body: &str) -> Self {
        Self::new([Lookup::Body(body.to_string())])
    }

    /// Answer with each body in turn
    pub fn sequence(bodies: &[&str]) -> Self {
        Self::new(bodies.iter().map(|b| Lookup::Body(b.to_string())))
    }

    /// Get the number of times fetch_ipv4() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn fetch_ipv4(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        let reply = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = next {
                *last = Some(next);
            }
            last.clone()
        };

        match reply {
            Some(Lookup::Body(body)) => Ok(body),
            Some(Lookup::TransportError) | None => {
                Err(Error::ip_source("Request failed: connection refused"))
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// An InterfaceSource serving a single interface with a mutable address list
#[derive(Clone)]
pub struct StaticInterfaces {
    name: String,
    addresses: Arc<Mutex<Vec<IpAddr>>>,
    call_count: Arc<AtomicUsize>,
}

impl StaticInterfaces {
    pub fn new(name: &str, addresses: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            addresses: Arc::new(Mutex::new(parse_all(addresses))),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the addresses bound to the interface
    pub fn set_addresses(&self, addresses: &[&str]) {
        *self.addresses.lock().unwrap() = parse_all(addresses);
    }

    /// Get the number of times addresses() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

fn parse_all(addresses: &[&str]) -> Vec<IpAddr> {
    addresses.iter().map(|a| a.parse().unwrap()).collect()
}

impl InterfaceSource for StaticInterfaces {
    fn lookup(&self, name: &str) -> Result<NetworkInterface> {
        if name == self.name {
            Ok(NetworkInterface::new(name, Some(2)))
        } else {
            Err(Error::interface(format!("network interface {} not found", name)))
        }
    }

    fn addresses(&self, interface: &NetworkInterface) -> Result<Vec<IpAddr>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        assert_eq!(interface.name, self.name, "engine asked for the wrong interface");
        Ok(self.addresses.lock().unwrap().clone())
    }
}

/// One recorded update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub zone_id: String,
    pub record_id: String,
    pub content: String,
}

/// A mock DnsProvider that records calls
#[derive(Clone)]
pub struct MockDnsProvider {
    calls: Arc<Mutex<Vec<UpdateCall>>>,
    /// HTTP status every call answers with
    status: u16,
    /// Record ID whose update fails at the transport level
    fail_record: Option<String>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            status: 200,
            fail_record: None,
        }
    }

    /// Answer every call with the given HTTP status
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Fail the update of `record_id` as if the connection was refused
    pub fn failing_on(mut self, record_id: &str) -> Self {
        self.fail_record = Some(record_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<UpdateCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        content: &str,
    ) -> Result<UpdateResult> {
        self.calls.lock().unwrap().push(UpdateCall {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
            content: content.to_string(),
        });

        if self.fail_record.as_deref() == Some(record_id) {
            return Err(Error::dns_provider("HTTP request failed: connection refused"));
        }

        if (200..300).contains(&self.status) {
            Ok(UpdateResult::Accepted {
                status: self.status,
            })
        } else {
            Ok(UpdateResult::Rejected {
                status: self.status,
                body: r#"{"success":false,"errors":[{"code":10000,"message":"Authentication error"}]}"#
                    .to_string(),
            })
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create the configuration used across contract tests
pub fn test_config(sleep_ms: &str) -> DdnsConfig {
    let sleep_ms = sleep_ms.to_string();
    DdnsConfig::from_lookup(move |key| match key {
        "networkInterfaceName" => Some("eth0".to_string()),
        "apiKey" => Some("test-token".to_string()),
        "zoneId" => Some("zone-1".to_string()),
        "ipv4RecordId" => Some("rec-a".to_string()),
        "ipv6RecordId" => Some("rec-aaaa".to_string()),
        "sleepTime" => Some(sleep_ms.clone()),
        _ => None,
    })
}

/// Initial state for interface "eth0"
pub fn initial_state(sleep_ms: &str) -> AppState {
    AppState::new(&test_config(sleep_ms), NetworkInterface::new("eth0", Some(2)))
}

/// Build an engine over the given doubles
pub fn engine_with(
    ip_source: &ScriptedIpSource,
    interfaces: &StaticInterfaces,
    provider: &MockDnsProvider,
) -> (DdnsEngine, mpsc::Receiver<EngineEvent>) {
    DdnsEngine::new(
        Box::new(ip_source.clone()),
        Box::new(interfaces.clone()),
        Box::new(provider.clone()),
        256,
    )
    .expect("engine construction succeeds")
}

/// Collect every event already queued on the receiver
pub fn drain_events(rx: &mut mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
