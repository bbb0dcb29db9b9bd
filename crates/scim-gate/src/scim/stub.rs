//! Stub responses for intercepted requests.
//!
//! Two families exist. `silent` pretends every operation succeeded. `empty`
//! pretends the resource type holds no data: writes still succeed, but a
//! singleton read answers 404.

use super::builder::{scim_error, ScimResponseBuilder};
use super::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use super::{LIST_RESPONSE_SCHEMA, USER_SCHEMA};
use crate::body::decode_object;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// What the synthesizer needs to know about an intercepted request.
#[derive(Debug, Clone, Copy)]
pub struct StubRequest<'a> {
    /// Upper-cased HTTP method.
    pub method: &'a str,
    /// Resource with its leading slash, e.g. `/Users`.
    pub resource: &'a str,
    pub is_collection: bool,
    /// Raw inbound body, if one was read.
    pub body: Option<&'a [u8]>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stamp {
    Created,
    Modified,
}

#[derive(Clone)]
pub struct Synthesizer {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

impl Synthesizer {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Pretend success without contacting the upstream.
    pub fn silent(&self, req: &StubRequest<'_>) -> Response<Full<Bytes>> {
        match req.method {
            "DELETE" => ScimResponseBuilder::new(StatusCode::NO_CONTENT).build(),
            "POST" => ScimResponseBuilder::new(StatusCode::CREATED)
                .json(self.echo(req, Stamp::Created))
                .build(),
            "PUT" | "PATCH" => ScimResponseBuilder::new(StatusCode::OK)
                .json(self.echo(req, Stamp::Modified))
                .build(),
            // Anything else is answered like a GET
            _ if req.is_collection => empty_list(),
            _ => ScimResponseBuilder::new(StatusCode::OK)
                .json(json!({
                    "schemas": [USER_SCHEMA],
                    "id": self.ids.generate(),
                }))
                .build(),
        }
    }

    /// Pretend the resource type holds no data.
    pub fn empty(&self, req: &StubRequest<'_>) -> Response<Full<Bytes>> {
        match req.method {
            "DELETE" => ScimResponseBuilder::new(StatusCode::NO_CONTENT).build(),
            "POST" | "PUT" | "PATCH" => self.silent(req),
            _ if req.is_collection => empty_list(),
            _ => scim_error(StatusCode::NOT_FOUND, "Resource not found"),
        }
    }

    /// Caller-supplied fields merged with a fresh `id` and a `meta` block. The
    /// generated fields always win over caller-supplied ones.
    fn echo(&self, req: &StubRequest<'_>, stamp: Stamp) -> Value {
        let mut object = decode_object(req.body);
        let now = format_timestamp(self.clock.now());

        let mut meta = Map::new();
        meta.insert("resourceType".into(), resource_type(req.resource).into());
        if stamp == Stamp::Created {
            meta.insert("created".into(), now.clone().into());
        }
        meta.insert("lastModified".into(), now.into());
        if stamp == Stamp::Created {
            meta.insert("location".into(), "".into());
        }

        object
            .entry("schemas")
            .or_insert_with(|| json!([USER_SCHEMA]));
        object.insert("id".into(), self.ids.generate().into());
        object.insert("meta".into(), Value::Object(meta));
        Value::Object(object)
    }
}

fn empty_list() -> Response<Full<Bytes>> {
    ScimResponseBuilder::new(StatusCode::OK)
        .json(json!({
            "schemas": [LIST_RESPONSE_SCHEMA],
            "totalResults": 0,
            "Resources": [],
        }))
        .build()
}

/// `/Users` -> `User`, `/Groups` -> `Group`.
fn resource_type(resource: &str) -> String {
    let name = resource.trim_start_matches('/');
    name.strip_suffix('s').unwrap_or(name).to_string()
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
