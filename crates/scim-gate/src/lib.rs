//! scim-gate: a policy gateway in front of a SCIM 2.0 directory.
//!
//! Requests are matched against an ordered rule list. Matching requests are
//! rejected or answered with synthesized SCIM responses; everything else is
//! relayed to the upstream directory, optionally with its body normalized.

pub mod body;
pub mod config;
pub mod matcher;
pub mod metrics;
pub mod proxy;
pub mod scim;
pub mod transform;
