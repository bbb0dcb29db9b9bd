//! Configuration types for scim-gate.
//!
//! The configuration is loaded once at startup from a YAML file, validated,
//! and then treated as an immutable value for the lifetime of the process.

mod listen;
mod protocol;
mod rules;
mod transforms;
mod upstream;

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use listen::{MetricsConfig, ServerConfig};
pub use protocol::Protocol;
pub use rules::{Action, RuleConfig, WILDCARD_METHOD};
pub use transforms::TransformConfig;
pub use upstream::{ConnectionPoolConfig, UpstreamConfig};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// The directory every unmatched request is relayed to.
    pub upstream: UpstreamConfig,

    /// Ordered rule list. First match wins, so order is significant.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    #[serde(default)]
    pub transforms: TransformConfig,

    #[serde(default)]
    pub connection_pool: ConnectionPoolConfig,

    /// Prometheus listener. Disabled when the section is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsConfig>,
}

impl Config {
    /// Load and validate a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let config = Self::read_file(path)?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load a config file without validating it, so command-line overrides can
    /// be applied first. Call [`Config::validate`] afterwards.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self, anyhow::Error> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.server.validate()?;
        self.upstream.validate()?;

        for (idx, rule) in self.rules.iter().enumerate() {
            rule.validate()
                .with_context(|| format!("Invalid rule #{idx} ({})", rule.resource))?;
        }

        self.transforms.validate()?;

        if let Some(ref metrics) = self.metrics {
            if metrics.port == self.server.port {
                anyhow::bail!(
                    "metrics.port ({}) must differ from server.port",
                    metrics.port
                );
            }
        }

        Ok(())
    }
}
