use super::client::create_http_client;
use super::forwarding::Forwarder;
use crate::config::{Config, TransformConfig};
use crate::matcher::RuleSet;
use crate::scim::Synthesizer;

/// Immutable per-process state shared by every request.
pub struct Gateway {
    rules: RuleSet,
    base_path: Option<String>,
    transforms: TransformConfig,
    synthesizer: Synthesizer,
    forwarder: Forwarder,
}

impl Gateway {
    /// Build the gateway from a validated configuration.
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let http_client =
            create_http_client(&config.connection_pool, config.upstream.tls_skip_verify);
        let forwarder = Forwarder::new(config, http_client)?;

        Ok(Self {
            rules: RuleSet::compile(&config.rules),
            base_path: config.server.base_path.clone(),
            transforms: config.transforms.clone(),
            synthesizer: Synthesizer::default(),
            forwarder,
        })
    }

    /// Replace the clock and id source used for stub responses.
    pub fn with_synthesizer(mut self, synthesizer: Synthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    pub fn transforms(&self) -> &TransformConfig {
        &self.transforms
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }
}
