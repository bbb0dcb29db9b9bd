//! SCIM 2.0 wire constants and response synthesis.
//!
//! - `builder` - `ScimResponseBuilder` and the protocol error envelope
//! - `stub` - the `Synthesizer` producing silent and empty stub responses
//! - `clock` - injectable time and identifier sources

mod builder;
mod clock;
mod stub;

pub use builder::{scim_error, ScimResponseBuilder};
pub use clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use stub::{StubRequest, Synthesizer};

pub const SCIM_CONTENT_TYPE: &str = "application/scim+json";

pub const ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";
pub const LIST_RESPONSE_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";
pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
