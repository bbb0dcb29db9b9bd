//! Interception rule configuration.

use serde::{Deserialize, Serialize};

/// Method entry that matches every HTTP method.
pub const WILDCARD_METHOD: &str = "*";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Single path segment prefixed with `/`, e.g. `/Users`. Compared case-sensitively.
    pub resource: String,
    /// HTTP methods this rule applies to. Case-insensitive; `*` matches any.
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    #[serde(default)]
    pub action: Action,
}

fn default_methods() -> Vec<String> {
    vec![WILDCARD_METHOD.to_string()]
}

/// What happens to a request once a rule matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Answer 403 without contacting the upstream.
    #[default]
    Reject,
    /// Pretend the operation succeeded.
    Silent,
    /// Pretend the resource type holds no data.
    Empty,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Reject => "reject",
            Action::Silent => "silent",
            Action::Empty => "empty",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RuleConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let segment = match self.resource.strip_prefix('/') {
            Some(segment) => segment,
            None => anyhow::bail!("resource must start with '/', got '{}'", self.resource),
        };
        if segment.is_empty() || segment.contains('/') {
            anyhow::bail!(
                "resource must be a single path segment such as '/Users', got '{}'",
                self.resource
            );
        }

        if self.methods.is_empty() {
            anyhow::bail!("methods must not be empty (omit it to match every method)");
        }
        if let Some(bad) = self.methods.iter().find(|m| m.trim().is_empty()) {
            anyhow::bail!("invalid method '{bad}'");
        }

        Ok(())
    }
}
