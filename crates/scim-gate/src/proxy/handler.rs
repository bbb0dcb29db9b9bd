//! Per-request orchestration.
//!
//! The handler reads the inbound body at most once, asks the rule engine for a
//! decision and either answers from the synthesizer or hands the request to the
//! forwarder. Every path produces a response; nothing here returns an error.

use super::context::Gateway;
use super::forwarding::ForwardBody;
use super::response_ext::ResponseExt;
use crate::body::{BoxError, GatewayBody};
use crate::config::Action;
use crate::matcher::ParsedPath;
use crate::metrics;
use crate::scim::{scim_error, StubRequest};
use crate::transform::apply_transforms;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{Request, Response, StatusCode};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Inbound body after the single read attempt.
enum InboundBody<B> {
    Read(Bytes),
    Unread(B),
}

/// Handle one inbound request.
pub async fn handle_request<B>(gateway: &Gateway, req: Request<B>) -> Response<GatewayBody>
where
    B: Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<BoxError>,
{
    let start_time = Instant::now();
    let (parts, body) = req.into_parts();
    let method = parts.method.as_str().to_ascii_uppercase();

    debug!("Received request: {} {}", parts.method, parts.uri);

    let response = match read_body(body).await {
        Ok(body) => dispatch(gateway, &parts, &method, body).await,
        Err(e) => {
            warn!("Failed to read request body for {} {}: {}", method, parts.uri, e);
            scim_error(StatusCode::BAD_REQUEST, "Failed to read request body").into_boxed()
        }
    };

    let status = response.status().as_u16();
    metrics::record_request(&method, status);
    debug!(
        "Completed {} {} with {} in {:.1}ms",
        method,
        parts.uri.path(),
        status,
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    response
}

/// End-of-stream bodies are left untouched; anything else is collected once.
async fn read_body<B>(body: B) -> Result<InboundBody<B>, BoxError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    if body.is_end_stream() {
        return Ok(InboundBody::Unread(body));
    }
    match body.collect().await {
        Ok(collected) => Ok(InboundBody::Read(collected.to_bytes())),
        Err(e) => Err(e.into()),
    }
}

async fn dispatch<B>(
    gateway: &Gateway,
    parts: &Parts,
    method: &str,
    body: InboundBody<B>,
) -> Response<GatewayBody>
where
    B: Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<BoxError>,
{
    let parsed = ParsedPath::parse(parts.uri.path(), gateway.base_path());

    if let Some(resource) = parsed.resource() {
        if let Some(rule) = gateway.rules().find(resource, method) {
            info!("{} {} intercepted by rule: {}", method, parts.uri.path(), rule);
            metrics::record_decision(rule.action.as_str());

            let stub = StubRequest {
                method,
                resource,
                is_collection: parsed.is_collection(),
                body: match &body {
                    InboundBody::Read(bytes) => Some(bytes.as_ref()),
                    InboundBody::Unread(_) => None,
                },
            };
            let response = match rule.action {
                Action::Reject => scim_error(
                    StatusCode::FORBIDDEN,
                    format!("Operation {} {} is not permitted", method, resource),
                ),
                Action::Silent => gateway.synthesizer().silent(&stub),
                Action::Empty => gateway.synthesizer().empty(&stub),
            };
            return response.into_boxed();
        }
    }

    metrics::record_decision("forward");
    let body = match body {
        InboundBody::Read(bytes) => {
            ForwardBody::Buffered(apply_transforms(&bytes, gateway.transforms()))
        }
        InboundBody::Unread(body) => {
            ForwardBody::Streaming(body.map_err(|e| -> BoxError { e.into() }).boxed())
        }
    };
    gateway.forwarder().forward(parts, body).await
}
