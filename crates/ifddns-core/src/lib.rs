// # ifddns-core
//
// Core library for the interface-polling DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for looking up the public IPv4 address
// - **InterfaceSource**: Trait for resolving an interface and listing its addresses
// - **DnsProvider**: Trait for updating DNS records via provider APIs
// - **AppState**: The state value threaded through every cycle
// - **DdnsEngine**: Detect → compare → update, then sleep, forever
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decisions live here, I/O lives in leaf crates
// 2. **State by Value**: Each step consumes the state and returns the next one
// 3. **Fail Loudly**: Any runtime error stops the loop; there are no retries
// 4. **Library-First**: The daemon is a thin wrapper around this crate

pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use traits::{DnsProvider, InterfaceSource, IpSource, UpdateResult};
pub use engine::{DdnsEngine, EngineEvent};
pub use config::DdnsConfig;
pub use error::{Error, Result};
pub use state::{AppState, NetworkInterface};
