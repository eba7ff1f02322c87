// # IP Source Trait
//
// Defines the interface for detecting the host's public IPv4 address.
//
// ## Implementations
//
// - HTTP lookup (ifconfig.me): `ifddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ifddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let ipv4 = source.fetch_ipv4().await?;
//     println!("public address: {ipv4}");
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for public IPv4 lookup implementations
///
/// Implementations perform exactly one lookup per call. They do not cache,
/// poll or retry: the engine decides when to ask again.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public IPv4 address
    ///
    /// The returned string is the lookup response body as received. It is
    /// compared and published verbatim, never parsed.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The response body
    /// - `Err(Error)`: If the request could not be sent or the body not read
    async fn fetch_ipv4(&self) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
