//! Outbound body transform configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransformConfig {
    /// Value written to `emails[0].type` when the caller left it blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject_email_type: Option<String>,
}

impl TransformConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if matches!(self.inject_email_type.as_deref(), Some(t) if t.is_empty()) {
            anyhow::bail!("transforms.inject_email_type must not be empty");
        }
        Ok(())
    }
}
