// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare DNS provider for the ifddns updater.
//
// ## Behavior
//
// - One PATCH per call, addressed by zone ID and record ID (no lookups)
// - Body is `{"content": "<ip>"}`; the record type and TTL are left as-is
// - Transport failures are errors; every HTTP response is `Ok`
// - Non-2xx responses come back as `UpdateResult::Rejected` with the body
// - NO retry, NO backoff, NO caching (the engine owns the loop)
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use ifddns_core::config::DEFAULT_API_BASE;
use ifddns_core::traits::{DnsProvider, UpdateResult};
use ifddns_core::{Error, Result};
use serde::Serialize;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// PATCH payload: only the record content changes
#[derive(Debug, Serialize)]
struct RecordPatch<'a> {
    content: &'a str,
}

/// Cloudflare DNS provider
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API v4 base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider against the public Cloudflare API
    ///
    /// An empty token is accepted; Cloudflare will reject the calls, which
    /// surfaces as `UpdateResult::Rejected`.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, DEFAULT_API_BASE)
    }

    /// Create a provider against a custom API base URL
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let api_token = api_token.into();
        if api_token.is_empty() {
            tracing::warn!("Cloudflare API token is empty; record updates will be rejected");
        }

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of a single DNS record
    fn record_url(&self, zone_id: &str, record_id: &str) -> String {
        format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, zone_id, record_id
        )
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Replace a record's content
    ///
    /// # API Call
    ///
    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    /// Content-Type: application/json
    ///
    /// { "content": "1.2.3.4" }
    /// ```
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        content: &str,
    ) -> Result<UpdateResult> {
        let url = self.record_url(zone_id, record_id);

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(&RecordPatch { content })
            .send()
            .await
            .map_err(|e| Error::dns_provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        // The body is informational only; failing to read it does not fail the call.
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        tracing::debug!("Cloudflare answered {} for record {}: {}", status, record_id, body);

        if status.is_success() {
            Ok(UpdateResult::Accepted {
                status: status.as_u16(),
            })
        } else {
            Ok(UpdateResult::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
