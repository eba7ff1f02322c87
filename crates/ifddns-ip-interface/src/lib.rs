// # Interface Source
//
// This crate resolves OS network interfaces and lists the addresses bound to
// them, backed by the `if-addrs` crate (getifaddrs(3) on Unix,
// GetAdaptersAddresses on Windows).
//
// ## Platform Notes
//
// `if-addrs` only reports interfaces that carry at least one IP address. On
// Linux an interface that exists but has no address yet is still resolved
// through `/sys/class/net`, so a freshly created link does not abort startup.

use ifddns_core::state::NetworkInterface;
use ifddns_core::traits::InterfaceSource;
use ifddns_core::{Error, Result};

use std::net::IpAddr;

/// Interface source backed by the host's network stack
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl SystemInterfaces {
    pub fn new() -> Self {
        Self
    }
}

impl InterfaceSource for SystemInterfaces {
    fn lookup(&self, name: &str) -> Result<NetworkInterface> {
        let interfaces = if_addrs::get_if_addrs()?;

        if let Some(found) = interfaces.iter().find(|iface| iface.name == name) {
            tracing::debug!("Resolved interface {} (index: {:?})", name, found.index);
            return Ok(NetworkInterface::new(name, found.index));
        }

        if link_exists(name) {
            tracing::debug!("Interface {} exists but has no addresses yet", name);
            return Ok(NetworkInterface::new(name, None));
        }

        Err(Error::interface(format!(
            "network interface {} not found",
            name
        )))
    }

    fn addresses(&self, interface: &NetworkInterface) -> Result<Vec<IpAddr>> {
        let addresses: Vec<IpAddr> = if_addrs::get_if_addrs()?
            .into_iter()
            .filter(|iface| iface.name == interface.name)
            .map(|iface| iface.ip())
            .collect();

        tracing::trace!("{} address(es) bound to {}", addresses.len(), interface);
        Ok(addresses)
    }
}

#[cfg(target_os = "linux")]
fn link_exists(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && std::path::Path::new("/sys/class/net").join(name).exists()
}

#[cfg(not(target_os = "linux"))]
fn link_exists(_name: &str) -> bool {
    false
}
