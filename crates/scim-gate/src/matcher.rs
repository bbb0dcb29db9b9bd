//! Rule engine.
//!
//! Rules are compiled once from configuration and evaluated as a linear scan
//! in configuration order. The first rule whose resource equals the request's
//! resource and whose method set contains the request method wins.

mod path;

pub use path::{strip_base_path, ParsedPath};

use crate::config::{Action, RuleConfig, WILDCARD_METHOD};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum MethodSet {
    Any,
    /// Upper-cased method names.
    Only(Vec<String>),
}

impl MethodSet {
    fn compile(methods: &[String]) -> Self {
        if methods.iter().any(|m| m.trim() == WILDCARD_METHOD) {
            return MethodSet::Any;
        }
        MethodSet::Only(
            methods
                .iter()
                .map(|m| m.trim().to_ascii_uppercase())
                .collect(),
        )
    }

    fn contains(&self, upper_method: &str) -> bool {
        match self {
            MethodSet::Any => true,
            MethodSet::Only(methods) => methods.iter().any(|m| m == upper_method),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub resource: String,
    methods: MethodSet,
    pub action: Action,
}

impl CompiledRule {
    pub fn compile(rule: &RuleConfig) -> Self {
        CompiledRule {
            resource: rule.resource.clone(),
            methods: MethodSet::compile(&rule.methods),
            action: rule.action,
        }
    }

    /// `upper_method` must already be upper-cased.
    pub fn matches(&self, resource: &str, upper_method: &str) -> bool {
        self.resource == resource && self.methods.contains(upper_method)
    }
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.methods {
            MethodSet::Any => write!(f, "{} {} [*]", self.action, self.resource),
            MethodSet::Only(methods) => {
                write!(f, "{} {} [{}]", self.action, self.resource, methods.join(", "))
            }
        }
    }
}

/// Ordered, immutable rule list.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn compile(rules: &[RuleConfig]) -> Self {
        RuleSet {
            rules: rules.iter().map(CompiledRule::compile).collect(),
        }
    }

    /// Find the first rule for `resource` that covers `method`. Method comparison
    /// is case-insensitive, resource comparison is exact.
    pub fn find(&self, resource: &str, method: &str) -> Option<&CompiledRule> {
        let upper = method.to_ascii_uppercase();
        self.rules.iter().find(|rule| rule.matches(resource, &upper))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(resource: &str, methods: &[&str], action: Action) -> RuleConfig {
        RuleConfig {
            resource: resource.to_string(),
            methods: methods.iter().map(|m| m.to_string()).collect(),
            action,
        }
    }

    #[test]
    fn test_wildcard_matches_every_method() {
        let rules = RuleSet::compile(&[rule("/Groups", &["*"], Action::Empty)]);

        for method in ["GET", "POST", "delete", "Patch", "PROPFIND"] {
            let matched = rules.find("/Groups", method).unwrap();
            assert_eq!(matched.action, Action::Empty);
        }
    }

    #[test]
    fn test_method_comparison_case_insensitive() {
        let rules = RuleSet::compile(&[rule("/Users", &["delete", "Patch"], Action::Silent)]);

        assert!(rules.find("/Users", "DELETE").is_some());
        assert!(rules.find("/Users", "patch").is_some());
        assert!(rules.find("/Users", "GET").is_none());
    }

    #[test]
    fn test_resource_comparison_exact() {
        let rules = RuleSet::compile(&[rule("/Users", &["*"], Action::Reject)]);

        assert!(rules.find("/Users", "GET").is_some());
        assert!(rules.find("/users", "GET").is_none());
        assert!(rules.find("/User", "GET").is_none());
        assert!(rules.find("/UsersX", "GET").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let rules = RuleSet::compile(&[
            rule("/Users", &["DELETE"], Action::Reject),
            rule("/Users", &["*"], Action::Silent),
        ]);

        assert_eq!(rules.find("/Users", "DELETE").unwrap().action, Action::Reject);
        assert_eq!(rules.find("/Users", "POST").unwrap().action, Action::Silent);
    }

    #[test]
    fn test_no_rules_no_match() {
        let rules = RuleSet::default();
        assert!(rules.is_empty());
        assert!(rules.find("/Users", "GET").is_none());
    }

    #[test]
    fn test_display() {
        let wildcard = CompiledRule::compile(&rule("/Groups", &["*"], Action::Empty));
        assert_eq!(wildcard.to_string(), "empty /Groups [*]");

        let listed = CompiledRule::compile(&rule("/Users", &["post", "PUT"], Action::Silent));
        assert_eq!(listed.to_string(), "silent /Users [POST, PUT]");
    }
}
