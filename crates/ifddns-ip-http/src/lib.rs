// # HTTP IP Source
//
// This crate provides the public IPv4 lookup for the ifddns updater.
//
// ## Behavior
//
// One GET per call against a "what is my IP" endpoint (default
// `https://ifconfig.me/ip`). The whole response body is the address; it is
// returned untouched, without trimming or parsing.
//
// Only transport and body-read failures are errors. A non-2xx response is
// logged, and its body is still returned.
//
// No polling, caching or retry happens here: the engine owns the loop.

use ifddns_core::config::DEFAULT_IP_LOOKUP_URL;
use ifddns_core::traits::IpSource;
use ifddns_core::{Error, Result};

use std::time::Duration;

/// HTTP timeout for a single lookup
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IPv4 lookup
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL whose response body is the address
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://ifconfig.me/ip")
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Lookup URL in use
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LOOKUP_URL)
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn fetch_ipv4(&self) -> Result<String> {
        tracing::debug!("Fetching public IPv4 address from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("IP lookup {} answered with HTTP {}", self.url, status);
        }

        response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
