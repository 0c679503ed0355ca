pub mod filter;
pub mod select;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use scoper_common::config::{Config, ExplicitLevel};

#[derive(Parser, Debug)]
#[command(name = "scoper", version)]
#[command(about = "Filters recon output down to what a bug bounty program allows you to test.")]
#[command(after_help = "Examples:
  cat recon-targets.txt | scoper -c google
  cat recon-targets.txt | scoper
  scoper -f recon-targets.txt -c google -e 2
  scoper -f recon-targets.txt --inscope-file scopes.txt --outofscope-file noscopes.txt -e 2")]
pub struct CommandLine {
    /// Targets to filter, one per line. Piped STDIN is used instead when present
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Look up the scope of this company in the scope database
    #[arg(short = 'c', long)]
    pub company: Option<String>,

    /// In-scope rules, one per line
    #[arg(long, visible_alias = "ins", value_name = "PATH")]
    pub inscope_file: Option<PathBuf>,

    /// Out-of-scope rules, one per line. Replaces the company's own list when used with --company
    #[arg(long, visible_alias = "oos", alias = "outofcope-file", value_name = "PATH")]
    pub outofscope_file: Option<PathBuf>,

    /// 1: `example.com` also covers subdomains. 2: only `*.` rules cover subdomains.
    /// 3: `*.` rules are ignored
    #[arg(
        short = 'e',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(1..=3)
    )]
    pub explicit_level: u8,

    /// Print bare results only, for piping into other tools
    #[arg(long, visible_alias = "ch")]
    pub chain_mode: bool,

    /// Directory holding the cached scope database
    #[arg(long, value_name = "DIR")]
    pub database: Option<PathBuf>,

    /// Also report targets that matched no rule in either direction
    #[arg(long, visible_alias = "iu")]
    pub include_unsure: bool,

    /// Append the results to this file
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report hostnames instead of the original lines
    #[arg(long, visible_alias = "ho")]
    pub hostnames_only: bool,

    #[arg(long)]
    pub verbose: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> anyhow::Result<Config> {
        let explicit_level: ExplicitLevel = ExplicitLevel::try_from(self.explicit_level)
            .map_err(|level| anyhow!("Invalid explicit level {level}"))?;

        Ok(Config {
            explicit_level,
            include_unsure: self.include_unsure,
            hostnames_only: self.hostnames_only,
            chain_mode: self.chain_mode,
            verbose: self.verbose,
        })
    }
}
