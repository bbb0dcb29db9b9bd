//! HTTP client creation and configuration.
//!
//! This module provides functionality for creating and configuring
//! the shared HTTP client used for forwarding requests upstream.

use super::tls::NoVerifier;
use crate::body::GatewayBody;
use crate::config::ConnectionPoolConfig;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Type alias for the HTTP client used by the gateway.
pub type HttpClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, GatewayBody>;

/// Create a shared HTTP client with connection pooling.
///
/// # Arguments
/// * `pool` - Connection pool settings
/// * `skip_tls_verify` - Whether to skip TLS certificate verification
pub fn create_http_client(pool: &ConnectionPoolConfig, skip_tls_verify: bool) -> HttpClient {
    // Both ring and aws-lc-rs are linked; pin the process default so
    // `ClientConfig::builder()` is unambiguous. Fails only if already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mut http_connector = HttpConnector::new();
    http_connector.set_keepalive(Some(Duration::from_secs(pool.keepalive_timeout_secs)));
    http_connector.set_connect_timeout(Some(Duration::from_secs(pool.connect_timeout_secs)));
    http_connector.enforce_http(false); // Allow both HTTP and HTTPS

    let builder = if skip_tls_verify {
        warn!("TLS certificate verification DISABLED for the upstream (development/testing only)");
        HttpsConnectorBuilder::new().with_tls_config(
            rustls::ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerifier))
                .with_no_client_auth(),
        )
    } else {
        match HttpsConnectorBuilder::new().with_native_roots() {
            Ok(builder) => builder,
            Err(e) => {
                warn!(
                    "Failed to load native root certificates ({}); HTTPS upstreams will fail verification",
                    e
                );
                HttpsConnectorBuilder::new().with_tls_config(
                    rustls::ClientConfig::builder()
                        .with_root_certificates(rustls::RootCertStore::empty())
                        .with_no_client_auth(),
                )
            }
        }
    };

    // HTTP/1.1 only
    let https_connector = builder
        .https_or_http()
        .enable_http1()
        .wrap_connector(http_connector);

    let http_client = Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(pool.idle_timeout_secs))
        .pool_max_idle_per_host(pool.max_idle_per_host)
        .build(https_connector);

    info!(
        "Connection pool configured (HTTP/1.1): max_idle={}, idle_timeout={}s, keepalive={}s",
        pool.max_idle_per_host, pool.idle_timeout_secs, pool.keepalive_timeout_secs
    );

    http_client
}
