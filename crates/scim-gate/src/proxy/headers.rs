//! Outbound header handling for forwarded requests.

use hyper::header::{
    HeaderValue, AUTHORIZATION, CONNECTION, CONTENT_LENGTH, HOST, TRANSFER_ENCODING,
};
use hyper::HeaderMap;

/// Build the `Authorization` value for a configured bearer token. Marked
/// sensitive so it never shows up in debug output.
pub fn bearer_value(token: &str) -> Result<HeaderValue, hyper::header::InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Headers sent upstream, derived from the inbound ones.
///
/// - `host` and `connection` are connection-scoped and dropped
/// - `authorization` is replaced when a bearer token is configured
/// - with a buffered body, `content-length` is recomputed since a transform may
///   have changed the bytes
pub fn outbound_headers(
    inbound: &HeaderMap,
    authorization: Option<&HeaderValue>,
    buffered_len: Option<usize>,
) -> HeaderMap {
    let mut headers = inbound.clone();
    headers.remove(HOST);
    headers.remove(CONNECTION);

    if let Some(value) = authorization {
        headers.insert(AUTHORIZATION, value.clone());
    }

    if let Some(len) = buffered_len {
        headers.remove(TRANSFER_ENCODING);
        headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("gateway.local"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer caller"));
        headers.insert("content-type", HeaderValue::from_static("application/scim+json"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("10"));
        headers
    }

    #[test]
    fn test_connection_scoped_headers_dropped() {
        let headers = outbound_headers(&inbound(), None, None);
        assert!(headers.get(HOST).is_none());
        assert!(headers.get(CONNECTION).is_none());
        assert_eq!(headers.get("content-type").unwrap(), "application/scim+json");
    }

    #[test]
    fn test_caller_authorization_kept_without_token() {
        let headers = outbound_headers(&inbound(), None, None);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer caller");
    }

    #[test]
    fn test_configured_token_wins() {
        let token = bearer_value("upstream-secret").unwrap();
        let headers = outbound_headers(&inbound(), Some(&token), None);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer upstream-secret");
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn test_content_length_recomputed() {
        let mut inbound = inbound();
        inbound.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));

        let headers = outbound_headers(&inbound, None, Some(42));
        assert_eq!(headers.get(CONTENT_LENGTH).unwrap(), "42");
        assert!(headers.get(TRANSFER_ENCODING).is_none());
    }

    #[test]
    fn test_bearer_value_sensitive() {
        let value = bearer_value("abc").unwrap();
        assert!(value.is_sensitive());
        assert!(bearer_value("bad\ntoken").is_err());
    }
}
