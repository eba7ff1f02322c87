// # DNS Provider Trait
//
// Defines the interface for updating a single DNS record's content.
//
// ## Implementations
//
// - Cloudflare: `ifddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ifddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     provider.update_record("zone-id", "record-id", "203.0.113.7").await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Result of a DNS update call that reached the provider
///
/// Both variants are successful calls. A provider-side rejection does not
/// make `update_record` fail; callers that care must inspect the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// Provider answered with a 2xx status
    Accepted {
        /// HTTP status code
        status: u16,
    },
    /// Provider answered with a non-2xx status
    Rejected {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
}

/// Trait for DNS provider implementations
///
/// Providers are stateless and single-shot: one call, one HTTP request.
/// They never retry and never decide whether an update is needed.
///
/// # Error Semantics
///
/// `Err` means the request could not be sent or no response arrived.
/// Any HTTP response, whatever its status, is `Ok`.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Replace the content of a DNS record
    ///
    /// # Parameters
    ///
    /// - `zone_id`: The zone containing the record
    /// - `record_id`: The record to update
    /// - `content`: The new record content (an IP address string)
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        content: &str,
    ) -> Result<UpdateResult, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
