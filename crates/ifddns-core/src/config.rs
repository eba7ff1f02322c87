//! Configuration types for the DDNS updater
//!
//! Configuration comes from environment variables (optionally seeded from a
//! `.env` file by the daemon). Key names are camelCase and case-sensitive:
//!
//! - `networkInterfaceName`: interface to read the IPv6 address from (required)
//! - `apiKey`: Cloudflare API token
//! - `zoneId`: Cloudflare zone identifier
//! - `ipv4RecordId`: record updated with the public IPv4 address
//! - `ipv6RecordId`: record updated with the interface IPv6 address
//! - `sleepTime`: poll interval in milliseconds (default 300000)
//! - `logLevel`: trace, debug, info, warn or error (default info)
//! - `ipLookupUrl`: public IPv4 lookup endpoint (default ifconfig.me)
//! - `cloudflareApiBase`: Cloudflare API v4 base URL

use serde::{Deserialize, Serialize};

pub const ENV_NETWORK_INTERFACE: &str = "networkInterfaceName";
pub const ENV_API_KEY: &str = "apiKey";
pub const ENV_ZONE_ID: &str = "zoneId";
pub const ENV_IPV4_RECORD_ID: &str = "ipv4RecordId";
pub const ENV_IPV6_RECORD_ID: &str = "ipv6RecordId";
pub const ENV_SLEEP_TIME: &str = "sleepTime";
pub const ENV_LOG_LEVEL: &str = "logLevel";
pub const ENV_IP_LOOKUP_URL: &str = "ipLookupUrl";
pub const ENV_API_BASE: &str = "cloudflareApiBase";

/// Poll interval used when `sleepTime` is unset or not an integer (5 minutes)
pub const DEFAULT_SLEEP_MS: u64 = 300_000;

/// Extra time the watchdog timer waits beyond the poll interval
pub const DEFAULT_WATCHDOG_GRACE_MS: u64 = 60_000;

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://ifconfig.me/ip";

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main DDNS configuration
///
/// Loaded once at startup and never reloaded.
#[derive(Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Network interface whose global IPv6 address is published
    pub network_interface_name: String,

    /// Cloudflare API token (bearer)
    #[serde(default)]
    pub api_key: String,

    /// Zone containing both records
    #[serde(default)]
    pub zone_id: String,

    /// A record identifier
    #[serde(default)]
    pub ipv4_record_id: String,

    /// AAAA record identifier
    #[serde(default)]
    pub ipv6_record_id: String,

    /// Poll interval in milliseconds
    #[serde(default = "default_sleep_ms")]
    pub sleep_ms: u64,

    /// Watchdog grace period in milliseconds, added on top of `sleep_ms`
    #[serde(default = "default_watchdog_grace_ms")]
    pub watchdog_grace_ms: u64,

    /// Endpoint whose response body is the public IPv4 address
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    /// Cloudflare API v4 base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl DdnsConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Unset credentials become empty strings. A `sleepTime` that does not
    /// parse as a non-negative integer silently falls back to
    /// [`DEFAULT_SLEEP_MS`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            network_interface_name: lookup(ENV_NETWORK_INTERFACE).unwrap_or_default(),
            api_key: lookup(ENV_API_KEY).unwrap_or_default(),
            zone_id: lookup(ENV_ZONE_ID).unwrap_or_default(),
            ipv4_record_id: lookup(ENV_IPV4_RECORD_ID).unwrap_or_default(),
            ipv6_record_id: lookup(ENV_IPV6_RECORD_ID).unwrap_or_default(),
            sleep_ms: parse_sleep_ms(lookup(ENV_SLEEP_TIME).as_deref()),
            watchdog_grace_ms: DEFAULT_WATCHDOG_GRACE_MS,
            ip_lookup_url: non_empty(ENV_IP_LOOKUP_URL).unwrap_or_else(default_ip_lookup_url),
            api_base_url: non_empty(ENV_API_BASE).unwrap_or_else(default_api_base_url),
            log_level: non_empty(ENV_LOG_LEVEL).unwrap_or_else(default_log_level),
        }
    }

    /// Validate the configuration
    ///
    /// Only the interface name is mandatory. Empty identifiers are accepted
    /// and produce updates against empty record paths.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.network_interface_name.is_empty() {
            return Err(crate::Error::config("no network interface specified"));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(crate::Error::config(format!(
                "{} '{}' is not valid. Valid levels: {}",
                ENV_LOG_LEVEL,
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("network_interface_name", &self.network_interface_name)
            .field("api_key", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("ipv4_record_id", &self.ipv4_record_id)
            .field("ipv6_record_id", &self.ipv6_record_id)
            .field("sleep_ms", &self.sleep_ms)
            .field("watchdog_grace_ms", &self.watchdog_grace_ms)
            .field("ip_lookup_url", &self.ip_lookup_url)
            .field("api_base_url", &self.api_base_url)
            .field("log_level", &self.log_level)
            .finish()
    }
}

// Negative values fall back too: the sleep timer would otherwise fire at
// once and turn the loop into a busy poll against both APIs.
fn parse_sleep_ms(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SLEEP_MS)
}

fn default_sleep_ms() -> u64 {
    DEFAULT_SLEEP_MS
}

fn default_watchdog_grace_ms() -> u64 {
    DEFAULT_WATCHDOG_GRACE_MS
}

fn default_ip_lookup_url() -> String {
    DEFAULT_IP_LOOKUP_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
