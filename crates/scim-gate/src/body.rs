//! Body types and best-effort JSON decoding of request bodies.
//!
//! Inbound bodies are never trusted to be JSON. Callers that want to inspect a
//! body decode it here and get `None` back for anything that is not valid JSON,
//! instead of an error they would have to swallow.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use serde_json::{Map, Value};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body type of every response the gateway produces, synthesized or relayed.
pub type GatewayBody = BoxBody<Bytes, BoxError>;

/// Decode `bytes` as JSON, or `None` if it is not valid JSON.
pub fn decode_lenient(bytes: &[u8]) -> Option<Value> {
    serde_json::from_slice(bytes).ok()
}

/// Decode `bytes` as a JSON object. Absent, malformed or non-object bodies
/// all become an empty object.
pub fn decode_object(bytes: Option<&[u8]>) -> Map<String, Value> {
    match bytes.and_then(decode_lenient) {
        Some(Value::Object(object)) => object,
        _ => Map::new(),
    }
}
