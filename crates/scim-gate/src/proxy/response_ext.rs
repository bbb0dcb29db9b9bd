//! Response extension traits for common transformations.

use crate::body::{BoxError, GatewayBody};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::Response;
use std::convert::Infallible;

/// Extension trait for `Response<Full<Bytes>>` providing common transformations.
pub trait ResponseExt {
    /// Convert a synthesized response into the gateway's boxed body type, so it
    /// can be returned alongside relayed upstream responses.
    fn into_boxed(self) -> Response<GatewayBody>;
}

impl ResponseExt for Response<Full<Bytes>> {
    fn into_boxed(self) -> Response<GatewayBody> {
        self.map(|b| {
            b.map_err(|never: Infallible| -> BoxError { match never {} })
                .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_boxed_preserves_status() {
        let response = Response::builder()
            .status(404)
            .body(Full::new(Bytes::from("not found")))
            .unwrap();

        let boxed = response.into_boxed();
        assert_eq!(boxed.status(), 404);
    }

    #[tokio::test]
    async fn test_into_boxed_preserves_headers_and_body() {
        let response = Response::builder()
            .header("X-Custom", "value")
            .body(Full::new(Bytes::from("test")))
            .unwrap();

        let boxed = response.into_boxed();
        assert_eq!(
            boxed.headers().get("X-Custom").map(|v| v.to_str().unwrap()),
            Some("value")
        );
        let body = boxed.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("test"));
    }
}
