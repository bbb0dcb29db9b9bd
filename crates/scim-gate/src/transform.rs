//! Outbound body transforms.
//!
//! Applied only to requests that are forwarded. Every transform is idempotent:
//! a field the caller (or an earlier pass) already populated is never touched.

use crate::body::decode_lenient;
use crate::config::TransformConfig;
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

/// Apply the configured transforms to `body`. Returns the input unchanged
/// (same bytes) whenever there is nothing to do, including when the body is
/// not valid JSON.
pub fn apply_transforms(body: &Bytes, config: &TransformConfig) -> Bytes {
    let Some(email_type) = config.inject_email_type.as_deref() else {
        return body.clone();
    };
    let Some(mut value) = decode_lenient(body) else {
        return body.clone();
    };

    if !inject_email_type(&mut value, email_type) {
        return body.clone();
    }

    match serde_json::to_vec(&value) {
        Ok(bytes) => {
            debug!("Injected emails[0].type = {:?}", email_type);
            Bytes::from(bytes)
        }
        Err(e) => {
            warn!("Failed to re-serialize transformed body, forwarding original: {}", e);
            body.clone()
        }
    }
}

/// Set `emails[0].type` when it is missing, null or an empty string. Returns
/// whether the value changed.
fn inject_email_type(value: &mut Value, email_type: &str) -> bool {
    let Some(first) = value
        .get_mut("emails")
        .and_then(Value::as_array_mut)
        .and_then(|emails| emails.first_mut())
        .and_then(Value::as_object_mut)
    else {
        return false;
    };

    let populated = match first.get("type") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };
    if populated {
        return false;
    }

    first.insert("type".to_string(), Value::String(email_type.to_string()));
    true
}
