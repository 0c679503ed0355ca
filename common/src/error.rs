use thiserror::Error;

/// Problems with a single line of input.
///
/// None of these abort a run: the offending line is reported and skipped.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Couldn't parse {0} as a valid URL.")]
    InvalidTarget(String),

    #[error("Couldn't parse the scope {0} as a valid URL.")]
    InvalidHost(String),

    #[error("Couldn't parse the scope \"{rule}\" as a pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}
