//! Upstream and connection pool configuration.

use super::protocol::Protocol;
use hyper::header::HeaderValue;
use hyper::Uri;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Absolute base URL of the directory, e.g. `https://dir.example.com/scim`
    pub url: String,
    /// Sent as `Authorization: Bearer <token>`, replacing any caller-supplied value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    /// Seconds to wait for the upstream response head (0 = wait forever)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Skip TLS certificate verification (for self-signed certs in dev/test)
    #[serde(default)]
    pub tls_skip_verify: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

impl UpstreamConfig {
    /// Parse and extract protocol from URL
    pub fn get_protocol(&self) -> Result<Protocol, String> {
        let uri: Uri = self
            .url
            .parse()
            .map_err(|e| format!("Invalid upstream URL '{}': {e}", self.url))?;
        let scheme = uri
            .scheme_str()
            .ok_or_else(|| format!("Invalid URL format (missing scheme): {}", self.url))?;
        if uri.authority().is_none() {
            return Err(format!("Invalid URL format (missing host): {}", self.url));
        }
        Protocol::from_scheme(scheme)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Validate that the upstream configuration is valid
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.get_protocol().map_err(|e| anyhow::anyhow!(e))?;

        // Request paths are appended to the URL verbatim
        if self.url.contains('?') || self.url.contains('#') {
            anyhow::bail!(
                "upstream.url must not carry a query or fragment, got '{}'",
                self.url
            );
        }

        if let Some(ref token) = self.bearer_token {
            if token.is_empty() {
                anyhow::bail!("upstream.bearer_token must not be empty");
            }
            if HeaderValue::from_str(&format!("Bearer {token}")).is_err() {
                anyhow::bail!("upstream.bearer_token contains characters not allowed in a header");
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionPoolConfig {
    #[serde(default = "default_pool_max_idle_per_host")]
    pub max_idle_per_host: usize,

    #[serde(default = "default_pool_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_keepalive_timeout")]
    pub keepalive_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: default_pool_max_idle_per_host(),
            idle_timeout_secs: default_pool_idle_timeout(),
            keepalive_timeout_secs: default_keepalive_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_pool_max_idle_per_host() -> usize {
    100
}

fn default_pool_idle_timeout() -> u64 {
    90
}

fn default_keepalive_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    5
}
