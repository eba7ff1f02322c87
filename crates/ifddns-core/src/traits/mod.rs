//! Core traits for the DDNS updater
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Look up the public IPv4 address
//! - [`InterfaceSource`]: Resolve an interface and list its addresses
//! - [`DnsProvider`]: Update DNS records via provider APIs

pub mod ip_source;
pub mod interface_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use interface_source::InterfaceSource;
pub use dns_provider::{DnsProvider, UpdateResult};
