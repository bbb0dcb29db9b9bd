//! Listener and metrics configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Literal prefix stripped from inbound paths before matching and forwarding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            base_path: None,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(ref base_path) = self.base_path {
            if !base_path.starts_with('/') {
                anyhow::bail!("server.base_path must start with '/', got '{base_path}'");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}
