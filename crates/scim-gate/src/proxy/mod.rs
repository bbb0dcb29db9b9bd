//! Gateway proxy.
//!
//! # Module Structure
//!
//! - `server` - ProxyServer struct and accept loop, plus the metrics listener
//! - `context` - Gateway state shared by all requests
//! - `handler` - Per-request orchestration: rule decision, stub or forward
//! - `forwarding` - Request forwarding to the upstream directory
//! - `headers` - Outbound header rewriting
//! - `client` - HTTP client creation and configuration
//! - `tls` - TLS utilities for the upstream client

mod client;
mod context;
mod forwarding;
mod handler;
mod headers;
mod response_ext;
mod server;
mod tls;

pub use client::{create_http_client, HttpClient};
pub use context::Gateway;
pub use forwarding::{ForwardBody, ForwardError, Forwarder};
pub use handler::handle_request;
pub use response_ext::ResponseExt;
pub use server::{serve_metrics, ProxyServer};
