#![cfg(test)]
use std::path::Path;

use scoper_common::config::{Config, ExplicitLevel};
use scoper_common::network::target::Target;
use scoper_core::engine::{Classification, ScopeEngine, ScopeSet};
use scoper_core::sources::{self, TargetSource};

const TARGETS: &str = "\
https://www.example.com/login
https://jira.example.com
api.example.com:8443
http://192.168.1.42/
192.168.2.1
unrelated.org

not a url at all
https://www.example.com/login
";

const INSCOPE: &str = "\
*.example.com
192.168.1.0/24
";

const NOSCOPE: &str = "\
https://jira.example.com
this is not even close to a URL
";

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn load(dir: &Path) -> (Vec<Target>, usize, ScopeSet) {
    let targets_path = write(dir, "targets.txt", TARGETS);
    let inscope_path = write(dir, ".inscope", INSCOPE);
    let noscope_path = write(dir, ".noscope", NOSCOPE);

    let lines = sources::read_lines(&targets_path).unwrap();
    let (targets, rejected) = sources::parse_targets(&lines, &TargetSource::File(targets_path));

    let set = ScopeSet {
        name: "local".to_string(),
        in_scope: sources::read_lines(&inscope_path).unwrap(),
        out_of_scope: sources::read_lines(&noscope_path).unwrap(),
    };

    (targets, rejected, set)
}

/// Files on disk, through the engine and into an output file.
#[test]
fn files_to_output() {
    let dir = tempfile::tempdir().unwrap();
    let (targets, rejected, set) = load(dir.path());
    assert_eq!(rejected, 1, "the free-text line should be rejected");

    let cfg = Config {
        include_unsure: true,
        ..Config::default()
    };
    let result: Classification = ScopeEngine::from_scope_set(&set, &cfg).classify(&targets);

    assert_eq!(
        result.in_scope,
        vec![
            "api.example.com:8443",
            "http://192.168.1.42/",
            "https://www.example.com/login",
        ]
    );
    assert_eq!(result.unsure, vec!["192.168.2.1", "unrelated.org"]);
    assert_eq!(result.skipped_rules, 1);

    let out = dir.path().join("out.txt");
    sources::append_lines(&out, &result.in_scope).unwrap();
    sources::append_lines(&out, &result.unsure).unwrap();

    let written = sources::read_lines(&out).unwrap();
    assert_eq!(written.len(), 5);
    assert_eq!(written[0], "api.example.com:8443");
    assert_eq!(written[4], "unrelated.org");
}

#[test]
fn hostnames_only_collapses_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let (targets, _, set) = load(dir.path());

    let cfg = Config {
        hostnames_only: true,
        ..Config::default()
    };
    let result = ScopeEngine::from_scope_set(&set, &cfg).classify(&targets);

    assert_eq!(
        result.in_scope,
        vec!["192.168.1.42", "api.example.com", "www.example.com"]
    );
    assert!(result.unsure.is_empty());
}

#[test]
fn strict_level_drops_wildcard_rules() {
    let dir = tempfile::tempdir().unwrap();
    let (targets, _, set) = load(dir.path());

    let cfg = Config {
        explicit_level: ExplicitLevel::Strict,
        ..Config::default()
    };
    let result = ScopeEngine::from_scope_set(&set, &cfg).classify(&targets);

    assert_eq!(result.in_scope, vec!["http://192.168.1.42/"]);
}

#[test]
fn combined_programs_merge() {
    let dir = tempfile::tempdir().unwrap();
    let (targets, _, _) = load(dir.path());
    let cfg = Config {
        include_unsure: true,
        ..Config::default()
    };

    let first = ScopeSet {
        name: "first".to_string(),
        in_scope: vec!["*.example.com".to_string()],
        out_of_scope: vec![],
    };
    let second = ScopeSet {
        name: "second".to_string(),
        in_scope: vec!["unrelated.org".to_string()],
        out_of_scope: vec![],
    };

    let merged = [first, second]
        .iter()
        .map(|set| ScopeEngine::from_scope_set(set, &cfg).classify(&targets))
        .fold(Classification::default(), Classification::merge);

    assert!(merged.in_scope.contains(&"unrelated.org".to_string()));
    assert!(merged.in_scope.contains(&"https://jira.example.com".to_string()));
    assert_eq!(merged.unsure, vec!["192.168.2.1", "http://192.168.1.42/"]);
}

#[test]
fn scope_files_found_from_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".inscope", INSCOPE);
    let nested = dir.path().join("recon").join("round-1");
    std::fs::create_dir_all(&nested).unwrap();

    let found = sources::search_backwards_from(&nested, ".inscope").unwrap();
    assert_eq!(sources::read_lines(&found).unwrap().len(), 2);
}
