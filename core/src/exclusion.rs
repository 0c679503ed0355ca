//! Out-of-scope rules.
//!
//! A target that an in-scope rule accepted is still dropped when any
//! exclusion fires. Broken exclusion lines are reported and ignored; they
//! never veto anything on their own.

use scoper_common::network::rule::ScopeRule;
use scoper_common::network::target::Target;
use tracing::{debug, warn};

use crate::matcher::Policy;

#[derive(Debug, Default)]
pub struct ExclusionFilter {
    rules: Vec<(ScopeRule, bool)>,
    skipped: usize,
}

impl ExclusionFilter {
    /// Classifies every non-blank line in `lines` as an exclusion.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();

        for line in lines {
            let line: &str = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            match ScopeRule::parse(line) {
                Ok(rule) => {
                    let wildcard: bool = Policy::for_exclusion(&rule) == Policy::Wildcard;
                    debug!("Out-of-scope rule {} parsed as {:?}", line, rule.kind());
                    filter.rules.push((rule, wildcard));
                }
                Err(e) => {
                    warn!("Ignoring out-of-scope rule: {e}");
                    filter.skipped += 1;
                }
            }
        }

        filter
    }

    /// Returns true on the first exclusion that covers `target`.
    pub fn is_excluded(&self, target: &Target) -> bool {
        self.rules
            .iter()
            .any(|(rule, wildcard)| rule.matches(target, *wildcard))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of lines that couldn't be classified.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
