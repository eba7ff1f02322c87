// # Interface Source Trait
//
// Defines the interface for resolving an OS network interface and listing
// the addresses bound to it.
//
// ## Implementations
//
// - `if-addrs` backed: `ifddns-ip-interface` crate

use crate::state::NetworkInterface;
use std::net::IpAddr;

/// Trait for OS network interface inspection
///
/// Both operations are synchronous: enumerating interface addresses is a
/// single non-blocking syscall round on every supported platform.
pub trait InterfaceSource: Send + Sync {
    /// Resolve an interface by name
    ///
    /// # Returns
    ///
    /// - `Ok(NetworkInterface)`: The interface handle
    /// - `Err(Error::Interface)`: If no interface has that name
    fn lookup(&self, name: &str) -> Result<NetworkInterface, crate::Error>;

    /// List every address currently bound to the interface
    ///
    /// Addresses are returned in OS enumeration order, IPv4 and IPv6 mixed.
    /// Filtering is the caller's job.
    fn addresses(&self, interface: &NetworkInterface) -> Result<Vec<IpAddr>, crate::Error>;
}
