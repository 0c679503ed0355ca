//! The explicit-level policy: how each rule is applied for a run.

use scoper_common::config::ExplicitLevel;
use scoper_common::network::rule::{RuleKind, ScopeRule};

/// How a rule is applied to targets under a given [`ExplicitLevel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    /// The rule is ignored for this run.
    Skip,
    /// Domain rules only match the literal host.
    Exact,
    /// Domain rules match the host and everything ending with it.
    Wildcard,
}

impl Policy {
    pub fn for_level(rule: &ScopeRule, level: ExplicitLevel) -> Self {
        if level == ExplicitLevel::Strict && rule.has_wildcard_prefix() {
            return Policy::Skip;
        }

        match rule.kind() {
            RuleKind::SingleWildcardDomain(_) | RuleKind::MultiWildcardPattern(_) => {
                Policy::Wildcard
            }
            RuleKind::ExactDomain(_) if level == ExplicitLevel::Implicit => Policy::Wildcard,
            RuleKind::ExactDomain(_) | RuleKind::Ip(_) | RuleKind::Cidr(_) => Policy::Exact,
        }
    }

    /// Out-of-scope rules are always read as if `--explicit-level 2` was given.
    pub fn for_exclusion(rule: &ScopeRule) -> Self {
        Self::for_level(rule, ExplicitLevel::Wildcard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(raw: &str) -> ScopeRule {
        ScopeRule::parse(raw).unwrap()
    }

    #[test]
    fn test_policy_levels() {
        let exact = rule("example.com");
        let wildcard = rule("*.example.com");
        let pattern = rule("*.example.*");
        let cidr = rule("10.0.0.0/8");

        assert_eq!(Policy::for_level(&exact, ExplicitLevel::Implicit), Policy::Wildcard);
        assert_eq!(Policy::for_level(&exact, ExplicitLevel::Wildcard), Policy::Exact);
        assert_eq!(Policy::for_level(&exact, ExplicitLevel::Strict), Policy::Exact);

        assert_eq!(Policy::for_level(&wildcard, ExplicitLevel::Implicit), Policy::Wildcard);
        assert_eq!(Policy::for_level(&wildcard, ExplicitLevel::Wildcard), Policy::Wildcard);
        assert_eq!(Policy::for_level(&wildcard, ExplicitLevel::Strict), Policy::Skip);
        assert_eq!(Policy::for_level(&pattern, ExplicitLevel::Strict), Policy::Skip);

        assert_eq!(Policy::for_level(&cidr, ExplicitLevel::Implicit), Policy::Exact);
    }

    #[test]
    fn test_exclusion_policy_ignores_level_one() {
        assert_eq!(Policy::for_exclusion(&rule("jira.example.com")), Policy::Exact);
        assert_eq!(Policy::for_exclusion(&rule("*.example.com")), Policy::Wildcard);
    }
}
