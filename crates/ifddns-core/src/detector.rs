//! Address selection and change detection
//!
//! Pure functions used by [`DdnsEngine`](crate::DdnsEngine) once the raw
//! observations (lookup body, interface addresses) are in hand.

use std::net::{IpAddr, Ipv6Addr};

use crate::state::AppState;

/// Whether an IPv6 address is global unicast
///
/// Excludes the unspecified address, loopback, multicast, link-local unicast
/// (fe80::/10) and IPv4-mapped addresses. Unique-local (fc00::/7) addresses
/// count as global unicast.
pub fn is_global_unicast_v6(addr: &Ipv6Addr) -> bool {
    if addr.is_unspecified() || addr.is_loopback() || addr.is_multicast() {
        return false;
    }

    if addr.to_ipv4_mapped().is_some() {
        return false;
    }

    // fe80::/10
    (addr.segments()[0] & 0xffc0) != 0xfe80
}

/// Pick the IPv6 address to publish from an interface's address list
///
/// When several addresses qualify the last one in enumeration order wins.
pub fn select_ipv6(addresses: &[IpAddr]) -> Option<Ipv6Addr> {
    addresses.iter().rev().find_map(|addr| match addr {
        IpAddr::V6(v6) if is_global_unicast_v6(v6) => Some(*v6),
        _ => None,
    })
}

/// Fold a new observation into the state
///
/// Each address is compared against its stored value and replaced when it
/// differs, marking `update_required`. A missing IPv6 observation leaves the
/// stored IPv6 address untouched. `update_required` is never cleared here.
pub fn apply_observation(mut state: AppState, ipv4: String, ipv6: Option<Ipv6Addr>) -> AppState {
    if state.ipv4_address != ipv4 {
        state.ipv4_address = ipv4;
        state.update_required = true;
    }

    if let Some(ipv6) = ipv6 {
        let ipv6 = ipv6.to_string();
        if state.ipv6_address != ipv6 {
            state.ipv6_address = ipv6;
            state.update_required = true;
        }
    }

    state
}
