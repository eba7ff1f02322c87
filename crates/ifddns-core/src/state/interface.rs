use serde::{Deserialize, Serialize};

/// Handle to a resolved OS network interface
///
/// Produced by [`InterfaceSource::lookup`](crate::traits::InterfaceSource::lookup)
/// at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    /// Interface name (e.g. "eth0")
    pub name: String,
    /// OS interface index, when the platform reports one
    pub index: Option<u32>,
}

impl NetworkInterface {
    pub fn new(name: impl Into<String>, index: Option<u32>) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl std::fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
