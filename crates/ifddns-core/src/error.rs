//! Error types for the DDNS updater
//!
//! Every runtime error is fatal to the polling loop: the engine returns it
//! to the daemon, which logs it and exits.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Public IP lookup failed to send or its body could not be read
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Network interface missing from the host
    #[error("Interface error: {0}")]
    Interface(String),

    /// DNS record update failed at the transport level
    #[error("DNS provider error: {0}")]
    DnsProvider(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    /// The post-cycle watchdog timer fired before the sleep timer
    #[error("Application is stuck or unresponsive (watchdog fired after {0:?})")]
    Watchdog(std::time::Duration),
}

impl Error {
    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create an interface error
    pub fn interface(msg: impl Into<String>) -> Self {
        Self::Interface(msg.into())
    }

    /// Create a DNS provider error
    pub fn dns_provider(msg: impl Into<String>) -> Self {
        Self::DnsProvider(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
