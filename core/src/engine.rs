//! The classification pass.
//!
//! Every in-scope rule is evaluated against every target. Rules are
//! independent of each other, so the pass over rules fans out with `rayon`
//! and the partial results are folded together afterwards. Targets are
//! never mutated; exclusion verdicts are computed at most once per target.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use rayon::prelude::*;
use scoper_common::config::{Config, ExplicitLevel};
use scoper_common::network::rule::{ScopeRule, WILDCARD_PREFIX};
use scoper_common::network::target::Target;
use tracing::{debug, trace, warn};

use crate::exclusion::ExclusionFilter;
use crate::matcher::Policy;

/// One program's worth of scope: the only shape the engine needs from a scope source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeSet {
    pub name: String,
    pub in_scope: Vec<String>,
    pub out_of_scope: Vec<String>,
}

/// The outcome of a run. Rejected targets are not kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// Sorted, de-duplicated.
    pub in_scope: Vec<String>,
    /// Sorted, de-duplicated, never overlapping `in_scope`.
    pub unsure: Vec<String>,
    /// Scope lines (in or out) that couldn't be classified.
    pub skipped_rules: usize,
}

impl Classification {
    fn from_sets<S: AsRef<str> + Ord>(
        in_scope: BTreeSet<S>,
        unsure: BTreeSet<S>,
        skipped_rules: usize,
    ) -> Self {
        let unsure: Vec<String> = unsure
            .iter()
            .filter(|entry| !in_scope.contains(*entry))
            .map(|entry| entry.as_ref().to_string())
            .collect();

        Self {
            in_scope: in_scope.iter().map(|e| e.as_ref().to_string()).collect(),
            unsure,
            skipped_rules,
        }
    }

    /// Combines the results of several scope sets. In-scope still wins over unsure.
    pub fn merge(self, other: Classification) -> Classification {
        let in_scope: BTreeSet<String> = self.in_scope.into_iter().chain(other.in_scope).collect();
        let unsure: BTreeSet<String> = self.unsure.into_iter().chain(other.unsure).collect();
        Self::from_sets(in_scope, unsure, self.skipped_rules + other.skipped_rules)
    }

    pub fn is_empty(&self) -> bool {
        self.in_scope.is_empty() && self.unsure.is_empty()
    }
}

struct InScopeRule {
    rule: ScopeRule,
    wildcard: bool,
}

#[derive(Default)]
struct Partial<'a> {
    in_scope: BTreeSet<&'a str>,
    unsure: BTreeSet<&'a str>,
}

impl<'a> Partial<'a> {
    fn merge(mut self, other: Partial<'a>) -> Partial<'a> {
        self.in_scope.extend(other.in_scope);
        self.unsure.extend(other.unsure);
        self
    }
}

pub struct ScopeEngine {
    rules: Vec<InScopeRule>,
    exclusions: ExclusionFilter,
    skipped_rules: usize,
    include_unsure: bool,
    hostnames_only: bool,
}

impl ScopeEngine {
    /// Classifies `in_scope` once up front under the configured explicit level.
    pub fn new<I, S>(in_scope: I, exclusions: ExclusionFilter, cfg: &Config) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules: Vec<InScopeRule> = Vec::new();
        let mut skipped_rules: usize = exclusions.skipped();

        for line in in_scope {
            let line: &str = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            if cfg.explicit_level == ExplicitLevel::Strict && line.starts_with(WILDCARD_PREFIX) {
                debug!("Skipping {line} at explicit level {}", cfg.explicit_level);
                continue;
            }

            let rule: ScopeRule = match ScopeRule::parse(line) {
                Ok(rule) => rule,
                Err(e) => {
                    warn!("{e}");
                    skipped_rules += 1;
                    continue;
                }
            };

            match Policy::for_level(&rule, cfg.explicit_level) {
                Policy::Skip => {
                    debug!(
                        "Skipping {} at explicit level {}",
                        rule.raw(),
                        cfg.explicit_level
                    );
                }
                policy => {
                    debug!("In-scope rule {} parsed as {:?} ({policy:?})", line, rule.kind());
                    rules.push(InScopeRule {
                        rule,
                        wildcard: policy == Policy::Wildcard,
                    });
                }
            }
        }

        debug!(
            "{} in-scope rules and {} out-of-scope rules ready",
            rules.len(),
            exclusions.len()
        );

        Self {
            rules,
            exclusions,
            skipped_rules,
            include_unsure: cfg.include_unsure,
            hostnames_only: cfg.hostnames_only,
        }
    }

    pub fn from_scope_set(set: &ScopeSet, cfg: &Config) -> Self {
        let exclusions: ExclusionFilter = ExclusionFilter::new(&set.out_of_scope);
        Self::new(&set.in_scope, exclusions, cfg)
    }

    /// Number of in-scope rules that take part in matching.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn classify(&self, targets: &[Target]) -> Classification {
        let verdicts: Vec<OnceLock<bool>> = targets.iter().map(|_| OnceLock::new()).collect();

        let partial: Partial<'_> = self
            .rules
            .par_iter()
            .map(|rule| self.evaluate(rule, targets, &verdicts))
            .reduce(Partial::default, Partial::merge);

        Classification::from_sets(partial.in_scope, partial.unsure, self.skipped_rules)
    }

    fn evaluate<'a>(
        &self,
        rule: &InScopeRule,
        targets: &'a [Target],
        verdicts: &[OnceLock<bool>],
    ) -> Partial<'a> {
        let mut partial: Partial<'a> = Partial::default();

        for (target, verdict) in targets.iter().zip(verdicts) {
            let matched: bool = rule.rule.matches(target, rule.wildcard);
            if !matched && !self.include_unsure {
                continue;
            }

            if *verdict.get_or_init(|| self.exclusions.is_excluded(target)) {
                trace!("{} is out of scope", target.raw);
                continue;
            }

            let entry: &'a str = target.output(self.hostnames_only);
            if matched {
                partial.in_scope.insert(entry);
            } else {
                partial.unsure.insert(entry);
            }
        }

        partial
    }
}
