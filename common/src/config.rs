use std::fmt;

/// How much a scope has to spell out before subdomains are accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExplicitLevel {
    /// `example.com` also covers `api.example.com`.
    #[default]
    Implicit,
    /// Only `*.example.com` covers `api.example.com`.
    Wildcard,
    /// Nothing implicit: `*.` rules are ignored altogether.
    Strict,
}

impl TryFrom<u8> for ExplicitLevel {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Implicit),
            2 => Ok(Self::Wildcard),
            3 => Ok(Self::Strict),
            other => Err(other),
        }
    }
}

impl From<ExplicitLevel> for u8 {
    fn from(level: ExplicitLevel) -> Self {
        match level {
            ExplicitLevel::Implicit => 1,
            ExplicitLevel::Wildcard => 2,
            ExplicitLevel::Strict => 3,
        }
    }
}

impl fmt::Display for ExplicitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Subdomain policy applied to in-scope rules.
    ///
    /// Out-of-scope rules ignore this and always behave as [`ExplicitLevel::Wildcard`].
    pub explicit_level: ExplicitLevel,
    /// Also report targets that matched nothing in either direction.
    pub include_unsure: bool,
    /// Report the normalized host instead of the original line.
    pub hostnames_only: bool,
    /// Bare output for piping into other tools. Silences warnings.
    pub chain_mode: bool,
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_from_u8() {
        assert_eq!(ExplicitLevel::try_from(1), Ok(ExplicitLevel::Implicit));
        assert_eq!(ExplicitLevel::try_from(2), Ok(ExplicitLevel::Wildcard));
        assert_eq!(ExplicitLevel::try_from(3), Ok(ExplicitLevel::Strict));
        assert_eq!(ExplicitLevel::try_from(0), Err(0));
        assert_eq!(ExplicitLevel::try_from(4), Err(4));
    }

    #[test]
    fn test_explicit_level_default_is_implicit() {
        assert_eq!(ExplicitLevel::default(), ExplicitLevel::Implicit);
        assert_eq!(ExplicitLevel::Strict.to_string(), "3");
    }
}
