#![cfg(test)]
use async_trait::async_trait;
use scoper_common::config::Config;
use scoper_common::network::target::Target;
use scoper_core::database::{Database, Fetcher};
use scoper_core::engine::{Classification, ScopeEngine};
use scoper_core::sources;

const DUMP: &str = r#"{
    "white_listed": [],
    "pgms": [
        {
            "name": "Acme Security",
            "firebounty_url": "https://firebounty.com/acme",
            "scopes": {
                "in_scopes": [
                    {"scope": "*.acme.com", "scope_type": "web_application"},
                    {"scope": "10.10.0.0/16", "scope_type": "web_application"},
                    {"scope": "com.acme.app", "scope_type": "android_application"}
                ],
                "out_of_scopes": [
                    {"scope": "https://status.acme.com", "scope_type": "web_application"}
                ]
            }
        },
        {
            "name": "Acme Labs",
            "scopes": {
                "in_scopes": [{"scope": "acmelabs.io", "scope_type": "web_application"}],
                "out_of_scopes": null
            }
        }
    ]
}"#;

struct Offline;

#[async_trait]
impl Fetcher for Offline {
    async fn fetch(&self) -> anyhow::Result<Vec<u8>> {
        Ok(DUMP.as_bytes().to_vec())
    }
}

fn targets() -> Vec<Target> {
    [
        "https://www.acme.com",
        "https://status.acme.com/health",
        "10.10.4.2",
        "dev.acmelabs.io",
        "example.com",
    ]
    .iter()
    .map(|raw| Target::parse(raw).unwrap())
    .collect()
}

/// A cached database program, turned into a scope set and applied.
#[tokio::test]
async fn company_lookup_to_classification() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::load(dir.path(), &Offline).await.unwrap();

    let matches = db.search("acme security");
    assert_eq!(matches.len(), 1);

    let set = matches[0].scope_set();
    assert_eq!(set.in_scope, vec!["*.acme.com", "10.10.0.0/16"]);

    let result = ScopeEngine::from_scope_set(&set, &Config::default()).classify(&targets());
    assert_eq!(result.in_scope, vec!["10.10.4.2", "https://www.acme.com"]);
}

#[tokio::test]
async fn combine_all_programs() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::load(dir.path(), &Offline).await.unwrap();
    let cfg = Config::default();

    let matches = db.search("ACME");
    assert_eq!(matches.len(), 2);

    let targets = targets();
    let merged = matches
        .iter()
        .map(|program| ScopeEngine::from_scope_set(&program.scope_set(), &cfg).classify(&targets))
        .fold(Classification::default(), Classification::merge);

    assert_eq!(
        merged.in_scope,
        vec!["10.10.4.2", "dev.acmelabs.io", "https://www.acme.com"]
    );
    assert!(merged.unsure.is_empty());
}

/// An explicit out-of-scope file replaces the program's own exclusions.
#[tokio::test]
async fn outofscope_file_replaces_program_exclusions() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::load(dir.path(), &Offline).await.unwrap();
    let oos = dir.path().join("oos.txt");
    std::fs::write(&oos, "www.acme.com\n").unwrap();

    let mut sets: Vec<_> = db.search("acme security").into_iter().map(|p| p.scope_set()).collect();
    sources::override_exclusions(&mut sets, Some(&oos)).unwrap();
    assert_eq!(sets[0].out_of_scope, vec!["www.acme.com"]);

    let result = ScopeEngine::from_scope_set(&sets[0], &Config::default()).classify(&targets());
    assert_eq!(
        result.in_scope,
        vec!["10.10.4.2", "https://status.acme.com/health"]
    );
}
