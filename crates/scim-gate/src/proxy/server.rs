//! ProxyServer struct and main run loop.
//!
//! One spawned task per accepted connection, HTTP/1.1 only. The optional
//! metrics listener runs on its own port so the gateway's path space stays
//! entirely under the rule engine's control.

use super::context::Gateway;
use super::handler::handle_request;
use crate::config::Config;
use crate::metrics::collect_metrics;
use anyhow::Context;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// The main proxy server struct.
pub struct ProxyServer {
    gateway: Arc<Gateway>,
    port: u16,
    metrics_port: Option<u16>,
}

impl ProxyServer {
    /// Create a new ProxyServer from a validated configuration.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let gateway = Gateway::new(&config)?;
        Ok(Self::with_gateway(&config, gateway))
    }

    /// Create a server around an already-built gateway.
    pub fn with_gateway(config: &Config, gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            port: config.server.port,
            metrics_port: config.metrics.as_ref().map(|m| m.port),
        }
    }

    /// Bind the configured ports and serve until the task is dropped.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        if let Some(port) = self.metrics_port {
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;
            info!("Metrics available on http://{}/metrics", addr);
            tokio::spawn(async move {
                if let Err(e) = serve_metrics(listener).await {
                    error!("Metrics listener stopped: {}", e);
                }
            });
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind gateway listener on {addr}"))?;
        self.serve(listener).await
    }

    /// Serve gateway traffic on an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), anyhow::Error> {
        info!("Listening on http://{}", listener.local_addr()?);
        info!("Proxying to {}", self.gateway.forwarder().upstream_url());
        info!("Loaded {} rules", self.gateway.rules().len());
        for rule in self.gateway.rules().iter() {
            debug!("Rule: {}", rule);
        }

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let gateway = Arc::clone(&self.gateway);

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let gateway = Arc::clone(&gateway);
                    async move { Ok::<_, Infallible>(handle_request(&gateway, req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection from {}: {}", remote_addr, err);
                }
            });
        }
    }
}

/// Serve `GET /metrics` in the Prometheus text format; anything else is a 404.
pub async fn serve_metrics(listener: TcpListener) -> Result<(), anyhow::Error> {
    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            let service = service_fn(|req: Request<Incoming>| async move {
                Ok::<_, Infallible>(metrics_response(&req))
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Metrics connection error: {}", e);
            }
        });
    }
}

fn metrics_response<B>(req: &Request<B>) -> Response<Full<Bytes>> {
    if req.method() != Method::GET || req.uri().path() != "/metrics" {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::NOT_FOUND;
        return response;
    }

    let mut response = Response::new(Full::new(Bytes::from(collect_metrics())));
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4"),
    );
    response
}
