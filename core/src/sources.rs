//! Line sources and sinks: target lists, scope files and the output file.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use scoper_common::network::target::Target;
use tracing::{info, warn};

use crate::engine::ScopeSet;

pub const INSCOPE_FILE: &str = ".inscope";
pub const NOSCOPE_FILE: &str = ".noscope";

/// Where a batch of targets came from. Used to label warnings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSource {
    Stdin,
    File(PathBuf),
}

impl fmt::Display for TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSource::Stdin => write!(f, "STDIN"),
            TargetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Trimmed, non-blank lines of `reader`.
pub fn read_lines_from<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut lines: Vec<String> = Vec::new();
    for line in reader.lines() {
        let line: String = line?;
        let line: &str = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

pub fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let file: File =
        File::open(path).with_context(|| format!("Unable to read file: {}", path.display()))?;
    read_lines_from(BufReader::new(file))
        .with_context(|| format!("Unable to read file: {}", path.display()))
}

pub fn read_stdin() -> anyhow::Result<Vec<String>> {
    read_lines_from(io::stdin().lock()).context("Unable to read targets from STDIN")
}

/// Parses every line as a [`Target`]. Unparseable lines are reported and counted.
pub fn parse_targets(lines: &[String], source: &TargetSource) -> (Vec<Target>, usize) {
    let mut targets: Vec<Target> = Vec::with_capacity(lines.len());
    let mut rejected: usize = 0;

    for line in lines {
        match Target::parse(line) {
            Ok(target) => targets.push(target),
            Err(e) => {
                warn!("{source}: {e}");
                rejected += 1;
            }
        }
    }

    (targets, rejected)
}

/// Looks for `name` in `start` and then in each of its ancestors.
pub fn search_backwards_from(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Scope rules from local files.
///
/// `inscope_file` is used as given. Without it, `.inscope` is searched for from `start`
/// upwards, and so is `.noscope` unless `outofscope_file` is given.
pub fn local_scope_set(
    start: &Path,
    inscope_file: Option<&Path>,
    outofscope_file: Option<&Path>,
) -> anyhow::Result<ScopeSet> {
    let explicit_oos: Option<Vec<String>> = outofscope_file.map(read_lines).transpose()?;

    if let Some(path) = inscope_file {
        return Ok(ScopeSet {
            name: path.display().to_string(),
            in_scope: read_lines(path)?,
            out_of_scope: explicit_oos.unwrap_or_default(),
        });
    }

    let Some(inscope) = search_backwards_from(start, INSCOPE_FILE) else {
        bail!(
            "No company, no --inscope-file and no {INSCOPE_FILE} file found in {} or its parents",
            start.display()
        );
    };
    info!("Using in-scope rules from {}", inscope.display());

    let out_of_scope: Vec<String> = match explicit_oos {
        Some(lines) => lines,
        None => match search_backwards_from(start, NOSCOPE_FILE) {
            Some(noscope) => {
                info!("Using out-of-scope rules from {}", noscope.display());
                read_lines(&noscope)?
            }
            None => Vec::new(),
        },
    };

    Ok(ScopeSet {
        name: inscope.display().to_string(),
        in_scope: read_lines(&inscope)?,
        out_of_scope,
    })
}

/// Replaces every set's own exclusions with the rules in `outofscope_file`, if given.
pub fn override_exclusions(
    sets: &mut [ScopeSet],
    outofscope_file: Option<&Path>,
) -> anyhow::Result<()> {
    let Some(path) = outofscope_file else {
        return Ok(());
    };

    let out_of_scope: Vec<String> = read_lines(path)?;
    info!("Using out-of-scope rules from {} for every program", path.display());
    for set in sets {
        set.out_of_scope = out_of_scope.clone();
    }
    Ok(())
}

/// Appends `lines` to `path`, one per line, creating the file if needed.
pub fn append_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> anyhow::Result<()> {
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Unable to open output file: {}", path.display()))?;

    let mut writer = io::BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())
            .with_context(|| format!("Unable to write to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Unable to write to {}", path.display()))
}
