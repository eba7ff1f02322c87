//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Detecting the public IPv4 and interface IPv6 addresses
//! - Comparing them with the previous observation
//! - Pushing both DNS records when anything changed
//! - Pacing the loop between cycles
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  ┌─────────────────┐
//! │  IpSource   │  │ InterfaceSource │
//! └─────────────┘  └─────────────────┘
//!        │ ipv4           │ addresses
//!        └───────┬────────┘
//!                ▼
//!       ┌──────────────┐  AppState in  ┌─────────────┐
//!       │ DdnsEngine   │ ────────────▶ │ DnsProvider │
//!       └──────────────┘  AppState out └─────────────┘
//!                │
//!                ▼
//!       ┌──────────────┐
//!       │   Events     │
//!       └──────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. Fetch the public IPv4 address
//! 2. Select the interface's global IPv6 address
//! 3. Mark `update_required` if either differs from the stored value
//! 4. If required, update the IPv4 record, then the IPv6 record
//! 5. Clear `update_required` once both calls returned `Ok`
//!
//! Any error ends the loop. There are no retries.

use crate::detector;
use crate::error::{Error, Result};
use crate::state::AppState;
use crate::traits::{DnsProvider, InterfaceSource, IpSource, UpdateResult};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Default capacity of the engine event channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events emitted by the DdnsEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Loop started
    Started {
        interface: String,
    },

    /// A cycle finished detection
    AddressesDetected {
        ipv4: String,
        ipv6: String,
        update_required: bool,
    },

    /// DNS update started
    UpdateStarted {
        record_id: String,
        content: String,
    },

    /// Provider accepted the update
    UpdateSucceeded {
        record_id: String,
        status: u16,
    },

    /// Provider answered with a non-2xx status (still counted as success)
    UpdateRejected {
        record_id: String,
        status: u16,
        body: String,
    },

    /// DNS update failed at the transport level
    UpdateFailed {
        record_id: String,
        error: String,
    },

    /// Nothing changed, no update issued
    UpdateSkipped,

    /// A cycle returned an error; the loop is about to stop
    CycleFailed {
        error: String,
    },

    /// Loop stopped
    Stopped {
        reason: String,
    },
}

/// Core DDNS engine
///
/// The engine is stateless: every method takes the [`AppState`] by value and
/// returns the derived state, so the caller owns the only copy.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`]
/// 3. The loop runs until a cycle fails or a shutdown signal arrives
pub struct DdnsEngine {
    /// Public IPv4 lookup
    ip_source: Box<dyn IpSource>,

    /// Interface address enumeration
    interfaces: Box<dyn InterfaceSource>,

    /// DNS provider for updating records
    provider: Box<dyn DnsProvider>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: Public IPv4 lookup implementation
    /// - `interfaces`: Interface inspection implementation
    /// - `provider`: DNS provider implementation
    /// - `event_channel_capacity`: Capacity of the event channel (must be > 0)
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        ip_source: Box<dyn IpSource>,
        interfaces: Box<dyn InterfaceSource>,
        provider: Box<dyn DnsProvider>,
        event_channel_capacity: usize,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        if event_channel_capacity == 0 {
            return Err(Error::config("Event channel capacity must be > 0"));
        }

        let (tx, rx) = mpsc::channel(event_channel_capacity);

        let engine = Self {
            ip_source,
            interfaces,
            provider,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run the polling loop
    ///
    /// Runs cycles until one fails or SIGINT/ctrl-c is received.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: The cycle error (or watchdog) that stopped the loop
    pub async fn run(&self, state: AppState) -> Result<()> {
        self.run_internal(state, None).await
    }

    /// Run the polling loop with a programmatic shutdown signal
    ///
    /// Behaves like [`run()`](Self::run) but stops when `shutdown_rx`
    /// resolves instead of listening for ctrl-c. Passing `None` falls back to
    /// ctrl-c.
    pub async fn run_with_shutdown(
        &self,
        state: AppState,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(state, shutdown_rx).await
    }

    async fn run_internal(
        &self,
        mut state: AppState,
        mut shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        info!(
            "Starting update loop on interface {} (interval: {:?})",
            state.network_interface, state.sleep
        );
        self.emit_event(EngineEvent::Started {
            interface: state.network_interface.name.clone(),
        });

        loop {
            state = match self.run_cycle(state).await {
                Ok(next) => next,
                Err(e) => {
                    error!("Update cycle failed: {}", e);
                    self.emit_event(EngineEvent::CycleFailed {
                        error: e.to_string(),
                    });
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Cycle error".to_string(),
                    });
                    return Err(e);
                }
            };

            // The watchdog deadline is always later than the sleep deadline,
            // so the second branch cannot win while the timers run on the
            // same clock.
            let interval = state.sleep;
            let watchdog = state.watchdog();
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    debug!("Sleep of {:?} elapsed, starting next cycle", interval);
                }

                _ = tokio::time::sleep(watchdog) => {
                    error!("Application is stuck or unresponsive");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Watchdog".to_string(),
                    });
                    return Err(Error::Watchdog(watchdog));
                }

                _ = wait_for_shutdown(&mut shutdown_rx) => {
                    info!("Shutdown signal received");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    return Ok(());
                }
            }
        }
    }

    /// Run one detect → compare → update cycle
    pub async fn run_cycle(&self, state: AppState) -> Result<AppState> {
        let state = self.check_addresses(state).await?;
        self.update_records(state).await
    }

    /// Detect current addresses and fold them into the state
    ///
    /// # Errors
    ///
    /// Fails if the IPv4 lookup or the interface enumeration fails.
    pub async fn check_addresses(&self, state: AppState) -> Result<AppState> {
        let ipv4 = self.ip_source.fetch_ipv4().await?;
        debug!("{} returned {:?}", self.ip_source.source_name(), ipv4);

        let addresses = self.interfaces.addresses(&state.network_interface)?;
        let ipv6 = detector::select_ipv6(&addresses);
        if ipv6.is_none() {
            debug!(
                "No global unicast IPv6 address on {} ({} address(es) inspected)",
                state.network_interface,
                addresses.len()
            );
        }

        let state = detector::apply_observation(state, ipv4, ipv6);

        info!(
            "Current public IP addresses on interface {}: {} {}",
            state.network_interface, state.ipv4_address, state.ipv6_address
        );
        self.emit_event(EngineEvent::AddressesDetected {
            ipv4: state.ipv4_address.clone(),
            ipv6: state.ipv6_address.clone(),
            update_required: state.update_required,
        });

        Ok(state)
    }

    /// Push both records if the state says an update is required
    ///
    /// Both records are pushed even if only one address changed. The IPv4
    /// record goes first; if it fails the IPv6 record is not attempted.
    /// `update_required` is cleared only when both calls return `Ok`.
    pub async fn update_records(&self, mut state: AppState) -> Result<AppState> {
        if !state.update_required {
            info!("No update required");
            self.emit_event(EngineEvent::UpdateSkipped);
            return Ok(state);
        }

        self.push_record(&state.zone_id, &state.ipv4_record_id, &state.ipv4_address)
            .await?;
        self.push_record(&state.zone_id, &state.ipv6_record_id, &state.ipv6_address)
            .await?;

        state.update_required = false;
        Ok(state)
    }

    /// Perform a single record update
    ///
    /// A rejected update is logged but returned as success.
    async fn push_record(&self, zone_id: &str, record_id: &str, content: &str) -> Result<()> {
        info!("Updating DNS record {} with IP address {}", record_id, content);
        self.emit_event(EngineEvent::UpdateStarted {
            record_id: record_id.to_string(),
            content: content.to_string(),
        });

        match self.provider.update_record(zone_id, record_id, content).await {
            Ok(UpdateResult::Accepted { status }) => {
                info!(
                    "{} accepted update of record {} (status {})",
                    self.provider.provider_name(),
                    record_id,
                    status
                );
                self.emit_event(EngineEvent::UpdateSucceeded {
                    record_id: record_id.to_string(),
                    status,
                });
                Ok(())
            }
            Ok(UpdateResult::Rejected { status, body }) => {
                // Not an error: the call itself went through.
                warn!(
                    "{} rejected update of record {} (status {}): {}",
                    self.provider.provider_name(),
                    record_id,
                    status,
                    body
                );
                self.emit_event(EngineEvent::UpdateRejected {
                    record_id: record_id.to_string(),
                    status,
                    body,
                });
                Ok(())
            }
            Err(e) => {
                error!("Failed to update record {}: {}", record_id, e);
                self.emit_event(EngineEvent::UpdateFailed {
                    record_id: record_id.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if self.event_tx.try_send(event).is_err() {
            // Full or closed: the loop never blocks on observers.
            warn!("Event channel full, dropping event");
        }
    }
}

/// Resolve when the test channel fires, or on ctrl-c when there is none
async fn wait_for_shutdown(shutdown_rx: &mut Option<oneshot::Receiver<()>>) {
    match shutdown_rx {
        Some(rx) => {
            let _ = rx.await;
        }
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}
