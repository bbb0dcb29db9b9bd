//! Upstream protocol types.

use serde::{Deserialize, Serialize};

/// Protocol spoken to the upstream directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    /// Get protocol name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Parse protocol from a URL scheme
    pub fn from_scheme(scheme: &str) -> Result<Self, String> {
        match scheme.to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(format!(
                "Unsupported protocol '{other}'. Currently supported: http, https"
            )),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scheme() {
        assert_eq!(Protocol::from_scheme("http"), Ok(Protocol::Http));
        assert_eq!(Protocol::from_scheme("HTTPS"), Ok(Protocol::Https));
        assert!(Protocol::from_scheme("ftp").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Protocol::Https.to_string(), "https");
    }
}
