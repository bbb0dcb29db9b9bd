//! Request forwarding to the upstream directory.
//!
//! Forwarding is the only place the gateway talks to the network. Any
//! transport failure is translated into a SCIM 502 error here and never
//! retried.

use super::client::HttpClient;
use super::headers::{bearer_value, outbound_headers};
use super::response_ext::ResponseExt;
use crate::body::{BoxError, GatewayBody};
use crate::config::Config;
use crate::matcher::strip_base_path;
use crate::metrics;
use crate::scim::scim_error;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::HeaderValue;
use hyper::http::request::Parts;
use hyper::{Request, Response, StatusCode, Uri};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Failure to obtain a response head from the upstream.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid upstream request: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("{}", error_chain(.0))]
    Transport(#[from] hyper_util::client::legacy::Error),
    #[error("no response within {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Render an error and its sources as `outer: inner: root`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Body handed to the forwarder.
pub enum ForwardBody {
    /// Already read (and possibly transformed) by the orchestrator.
    Buffered(Bytes),
    /// Never read; streamed through as-is.
    Streaming(GatewayBody),
}

/// Relays requests to the configured upstream.
pub struct Forwarder {
    http_client: HttpClient,
    upstream_url: String,
    base_path: Option<String>,
    authorization: Option<HeaderValue>,
    timeout: Option<Duration>,
}

impl Forwarder {
    pub fn new(config: &Config, http_client: HttpClient) -> Result<Self, anyhow::Error> {
        let authorization = config
            .upstream
            .bearer_token
            .as_deref()
            .map(bearer_value)
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid upstream.bearer_token: {e}"))?;

        Ok(Self {
            http_client,
            upstream_url: config.upstream.url.trim_end_matches('/').to_string(),
            base_path: config.server.base_path.clone(),
            authorization,
            timeout: config.upstream.timeout(),
        })
    }

    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// Upstream URI for an inbound one: base path stripped, query preserved.
    pub fn upstream_uri(&self, inbound: &Uri) -> String {
        let path = inbound.path();
        let path = strip_base_path(path, self.base_path.as_deref()).unwrap_or(path);
        match inbound.query() {
            Some(query) => format!("{}{}?{}", self.upstream_url, path, query),
            None => format!("{}{}", self.upstream_url, path),
        }
    }

    /// Forward a request. Upstream responses are relayed verbatim; transport
    /// failures become a SCIM 502.
    pub async fn forward(&self, parts: &Parts, body: ForwardBody) -> Response<GatewayBody> {
        let method = parts.method.as_str().to_string();
        let start = Instant::now();

        match self.try_forward(parts, body).await {
            Ok(upstream_response) => {
                let status = upstream_response.status().as_u16();
                let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
                metrics::record_upstream_duration(&method, status, duration_ms);
                debug!("Upstream answered {} in {:.1}ms", status, duration_ms);

                upstream_response.map(|b| b.map_err(BoxError::from).boxed())
            }
            Err(e) => {
                error!("Failed to forward request to upstream: {}", e);
                metrics::record_upstream_error();
                scim_error(StatusCode::BAD_GATEWAY, format!("Upstream error: {e}")).into_boxed()
            }
        }
    }

    async fn try_forward(
        &self,
        parts: &Parts,
        body: ForwardBody,
    ) -> Result<Response<Incoming>, ForwardError> {
        let full_uri = self.upstream_uri(&parts.uri);
        debug!("Forwarding {} to: {}", parts.method, full_uri);

        let (body, buffered_len) = match body {
            ForwardBody::Buffered(bytes) => {
                let len = bytes.len();
                let body = Full::new(bytes)
                    .map_err(|never: Infallible| -> BoxError { match never {} })
                    .boxed();
                (body, Some(len))
            }
            ForwardBody::Streaming(body) => (body, None),
        };

        let mut upstream_req = Request::builder()
            .method(parts.method.clone())
            .uri(full_uri)
            .body(body)?;
        *upstream_req.headers_mut() =
            outbound_headers(&parts.headers, self.authorization.as_ref(), buffered_len);

        let request = self.http_client.request(upstream_req);
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| ForwardError::Timeout(limit))??,
            None => request.await?,
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::client::create_http_client;

    fn forwarder(yaml: &str) -> Forwarder {
        let config = Config::from_yaml(yaml).unwrap();
        let client = create_http_client(&config.connection_pool, false);
        Forwarder::new(&config, client).unwrap()
    }

    #[tokio::test]
    async fn test_upstream_uri_strips_base_path() {
        let forwarder = forwarder(
            "server:\n  base_path: /scim/v2\nupstream:\n  url: http://dir.local:9000/api/\n",
        );
        let uri: Uri = "/scim/v2/Users/42?attributes=userName".parse().unwrap();
        assert_eq!(
            forwarder.upstream_uri(&uri),
            "http://dir.local:9000/api/Users/42?attributes=userName"
        );
    }

    #[tokio::test]
    async fn test_upstream_uri_without_base_path_match() {
        let forwarder =
            forwarder("server:\n  base_path: /scim/v2\nupstream:\n  url: http://dir.local\n");
        let uri: Uri = "/health".parse().unwrap();
        assert_eq!(forwarder.upstream_uri(&uri), "http://dir.local/health");
    }

    #[tokio::test]
    async fn test_upstream_uri_no_base_path() {
        let forwarder = forwarder("upstream:\n  url: http://dir.local\n");
        let uri: Uri = "/Groups?filter=displayName%20eq%20%22x%22".parse().unwrap();
        assert_eq!(
            forwarder.upstream_uri(&uri),
            "http://dir.local/Groups?filter=displayName%20eq%20%22x%22"
        );
    }

    #[test]
    fn test_error_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "root"));
        assert_eq!(error_chain(&err), "outer: root");
    }

    #[test]
    fn test_timeout_message() {
        let err = ForwardError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "no response within 5s");
    }
}
