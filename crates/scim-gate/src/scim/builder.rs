use super::{ERROR_SCHEMA, SCIM_CONTENT_TYPE};
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde_json::{json, Value};

/// Builds synthesized responses. A JSON body always carries
/// `content-type: application/scim+json`; a response without a body carries no
/// content type at all.
pub struct ScimResponseBuilder {
    status: StatusCode,
    body: Option<Value>,
}

impl ScimResponseBuilder {
    pub fn new(status_code: StatusCode) -> Self {
        ScimResponseBuilder {
            status: status_code,
            body: None,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> Response<Full<Bytes>> {
        let payload = match self.body {
            Some(ref value) => Bytes::from(value.to_string()),
            None => Bytes::new(),
        };

        let mut response = Response::new(Full::new(payload));
        *response.status_mut() = self.status;
        if self.body.is_some() {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(SCIM_CONTENT_TYPE));
        }
        response
    }
}

/// SCIM error envelope: `{schemas, status, detail}` with `status` rendered as a
/// decimal string, as RFC 7644 section 3.12 requires.
pub fn scim_error(status: StatusCode, detail: impl Into<String>) -> Response<Full<Bytes>> {
    ScimResponseBuilder::new(status)
        .json(json!({
            "schemas": [ERROR_SCHEMA],
            "status": status.as_u16().to_string(),
            "detail": detail.into(),
        }))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response<Full<Bytes>>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_builder_with_status() {
        let response = ScimResponseBuilder::new(StatusCode::NO_CONTENT).build();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_builder_json_sets_content_type() {
        let response = ScimResponseBuilder::new(StatusCode::OK)
            .json(json!({"id": "1"}))
            .build();
        assert_eq!(
            response.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/scim+json"))
        );
    }

    #[tokio::test]
    async fn test_scim_error_envelope() {
        let response = scim_error(StatusCode::FORBIDDEN, "nope");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/scim+json"
        );

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
                "status": "403",
                "detail": "nope",
            })
        );
    }

    #[tokio::test]
    async fn test_scim_error_status_matches_http_status() {
        for status in [400u16, 403, 404, 409, 500, 502, 504] {
            let status = StatusCode::from_u16(status).unwrap();
            let response = scim_error(status, "detail");
            assert_eq!(response.status(), status);

            let body = body_json(response).await;
            assert_eq!(body["status"], json!(status.as_u16().to_string()));
            assert_eq!(body["schemas"], json!([ERROR_SCHEMA]));
        }
    }
}
