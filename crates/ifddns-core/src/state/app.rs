use std::time::Duration;

use crate::config::DdnsConfig;
use crate::state::NetworkInterface;

/// Application state for one updater process
///
/// Credentials, identifiers, the poll interval and the interface handle are
/// fixed at construction. `ipv4_address`, `ipv6_address` and
/// `update_required` are the only fields the engine derives anew each cycle.
///
/// # Invariant
///
/// `update_required` is true whenever either address has changed since the
/// last cycle in which both record updates succeeded. Only the engine clears
/// it, and only after both updates return `Ok` in the same cycle.
#[derive(Clone, PartialEq, Eq)]
pub struct AppState {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    pub api_key: String,
    pub zone_id: String,
    pub ipv4_record_id: String,
    pub ipv6_record_id: String,

    /// Last observed public IPv4 address, verbatim from the lookup endpoint
    pub ipv4_address: String,
    /// Last observed global IPv6 address, empty until one is seen
    pub ipv6_address: String,

    pub update_required: bool,

    /// Poll interval
    pub sleep: Duration,
    /// Grace period the watchdog timer adds on top of `sleep`
    pub watchdog_grace: Duration,

    pub network_interface: NetworkInterface,
}

impl AppState {
    /// Build the initial state
    ///
    /// Addresses start empty and `update_required` starts true, so the first
    /// cycle always pushes both records.
    pub fn new(config: &DdnsConfig, network_interface: NetworkInterface) -> Self {
        Self {
            api_key: config.api_key.clone(),
            zone_id: config.zone_id.clone(),
            ipv4_record_id: config.ipv4_record_id.clone(),
            ipv6_record_id: config.ipv6_record_id.clone(),
            ipv4_address: String::new(),
            ipv6_address: String::new(),
            update_required: true,
            sleep: Duration::from_millis(config.sleep_ms),
            watchdog_grace: Duration::from_millis(config.watchdog_grace_ms),
            network_interface,
        }
    }

    /// Deadline of the watchdog timer, measured from the end of a cycle
    pub fn watchdog(&self) -> Duration {
        self.sleep.saturating_add(self.watchdog_grace)
    }
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api_key", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("ipv4_record_id", &self.ipv4_record_id)
            .field("ipv6_record_id", &self.ipv6_record_id)
            .field("ipv4_address", &self.ipv4_address)
            .field("ipv6_address", &self.ipv6_address)
            .field("update_required", &self.update_required)
            .field("sleep", &self.sleep)
            .field("network_interface", &self.network_interface)
            .finish()
    }
}
