use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use colored::*;
use tracing::{info, warn};

use crate::commands::CommandLine;
use crate::commands::select::{self, Selection};
use crate::mprint;
use crate::terminal::{print, spinner::SpinnerFetcher};
use scoper_common::config::Config;
use scoper_common::network::target::Target;
use scoper_core::database::{Database, HttpFetcher, Program};
use scoper_core::engine::{Classification, ScopeEngine, ScopeSet};
use scoper_core::sources::{self, TargetSource};

pub async fn filter(args: &CommandLine, cfg: &Config) -> anyhow::Result<()> {
    let (lines, source) = read_targets(args)?;
    let (targets, rejected) = sources::parse_targets(&lines, &source);

    let scope_sets: Vec<ScopeSet> = resolve_scope_sets(args, cfg).await?;
    if scope_sets.is_empty() {
        return Ok(());
    }

    let result: Classification = classify(&scope_sets, &targets, cfg);

    if !cfg.chain_mode {
        mprint!();
        print::header("results");
    }

    print::results(&mut io::stdout().lock(), &result, cfg)
        .context("Unable to write the results")?;

    if result.is_empty() {
        warn!("None of the targets are in scope");
    }

    if let Some(path) = &args.output {
        write_output(path, &result, cfg)?;
    }

    if rejected > 0 || result.skipped_rules > 0 {
        warn!(
            "Skipped {rejected} of {} targets from {source} and {} scope rules that couldn't be parsed",
            lines.len(),
            result.skipped_rules
        );
    }
    if !cfg.chain_mode {
        print::summary(&result, targets.len(), cfg);
    }

    Ok(())
}

/// Piped STDIN wins over `--file`.
fn read_targets(args: &CommandLine) -> anyhow::Result<(Vec<String>, TargetSource)> {
    if !io::stdin().is_terminal() {
        let lines: Vec<String> = sources::read_stdin()?;
        if !lines.is_empty() {
            return Ok((lines, TargetSource::Stdin));
        }
    }

    match &args.file {
        Some(path) => Ok((sources::read_lines(path)?, TargetSource::File(path.clone()))),
        None => bail!("No targets were given. Pipe them through STDIN or use --file"),
    }
}

fn classify(scope_sets: &[ScopeSet], targets: &[Target], cfg: &Config) -> Classification {
    scope_sets
        .iter()
        .map(|set| {
            let engine: ScopeEngine = ScopeEngine::from_scope_set(set, cfg);
            info!(
                "Matching {} targets against {} rules of {}",
                targets.len(),
                engine.rule_count(),
                set.name
            );
            engine.classify(targets)
        })
        .fold(Classification::default(), Classification::merge)
}

fn write_output(path: &Path, result: &Classification, cfg: &Config) -> anyhow::Result<()> {
    sources::append_lines(path, &result.in_scope)?;
    if cfg.include_unsure {
        sources::append_lines(path, &result.unsure)?;
    }
    info!("Results appended to {}", path.display());
    Ok(())
}

async fn resolve_scope_sets(args: &CommandLine, cfg: &Config) -> anyhow::Result<Vec<ScopeSet>> {
    if let Some(company) = &args.company {
        let mut sets: Vec<ScopeSet> = company_scope_sets(company, args, cfg).await?;
        sources::override_exclusions(&mut sets, args.outofscope_file.as_deref())?;
        return Ok(sets);
    }

    let cwd: PathBuf = std::env::current_dir().context("Unable to get the current directory")?;
    let set: ScopeSet = sources::local_scope_set(
        &cwd,
        args.inscope_file.as_deref(),
        args.outofscope_file.as_deref(),
    )?;
    Ok(vec![set])
}

async fn company_scope_sets(
    company: &str,
    args: &CommandLine,
    cfg: &Config,
) -> anyhow::Result<Vec<ScopeSet>> {
    let dir: PathBuf = match &args.database {
        Some(dir) => dir.clone(),
        None => Database::default_dir()?,
    };

    let fetcher = SpinnerFetcher::new(HttpFetcher::new()?, !cfg.chain_mode);
    let db: Database = Database::load(&dir, &fetcher).await?;
    let matches: Vec<&Program> = db.search(company);

    let chosen: Vec<&Program> = match matches.len() {
        0 => {
            warn!("0 (lowercase'd) company names contained the string \"{company}\"");
            return Ok(Vec::new());
        }
        1 => matches,
        _ => {
            select::ensure_interactive(cfg.chain_mode, io::stdin().is_terminal())?;
            let names: Vec<&str> = matches.iter().map(|p| p.name.as_str()).collect();
            let selection: Selection =
                select::prompt(io::stdin().lock(), &mut io::stderr(), company, &names)?;
            info!(
                "If you want to remove one of these options, feel free to modify your database: {}",
                db.path().display()
            );
            match selection {
                Selection::One(i) => vec![matches[i]],
                Selection::All => matches,
            }
        }
    };

    for program in &chosen {
        info!(
            "Search for \"{company}\" matched the company {}!",
            program.name.green()
        );
        if cfg.verbose {
            let record: String = serde_json::to_string_pretty(program)
                .context("Unable to render the program record")?;
            print::print(&record);
        }
        for finding in program.lint() {
            warn!(
                "{finding}. Consider editing {} and reporting it to the program.",
                db.path().display()
            );
        }
    }

    Ok(chosen.into_iter().map(Program::scope_set).collect())
}
