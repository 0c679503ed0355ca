//! # Scope Database
//!
//! A local cache of the public FireBounty scope dump. The cache file lives in
//! a per-user directory and is replaced once it is older than a day.
//!
//! Downloading goes through the [`Fetcher`] trait so the loader can be driven
//! without network access.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use scoper_common::network::target::extract_host;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::engine::ScopeSet;

pub const DATABASE_URL: &str = "https://firebounty.com/api/v1/scope/all/url_only/";
pub const DATABASE_FILENAME: &str = "firebounty-scope-url_only.json";
pub const MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

const WEB_APPLICATION: &str = "web_application";
const SUSPICIOUS_PREFIXES: [&str; 2] = ["com.", "org."];

// The dump is scraped; any field may be null or missing.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default, deserialize_with = "nullable")]
    pub scope: String,
    #[serde(default, deserialize_with = "nullable")]
    pub scope_type: String,
}

impl Scope {
    fn is_web_application(&self) -> bool {
        self.scope_type == WEB_APPLICATION && !self.scope.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scopes {
    #[serde(default, deserialize_with = "nullable")]
    pub in_scopes: Vec<Scope>,
    #[serde(default, deserialize_with = "nullable")]
    pub out_of_scopes: Vec<Scope>,
}

/// One bug bounty program.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default, deserialize_with = "nullable")]
    pub firebounty_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub scopes: Scopes,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tag: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

impl Program {
    /// Web application scopes only; every other asset type is dropped.
    pub fn scope_set(&self) -> ScopeSet {
        let web = |scopes: &[Scope]| -> Vec<String> {
            scopes
                .iter()
                .filter(|s| s.is_web_application())
                .map(|s| s.scope.trim().to_string())
                .collect()
        };

        ScopeSet {
            name: self.name.clone(),
            in_scope: web(&self.scopes.in_scopes),
            out_of_scope: web(&self.scopes.out_of_scopes),
        }
    }

    /// Entries that usually mean the program's scope was entered wrong.
    pub fn lint(&self) -> Vec<String> {
        let set: ScopeSet = self.scope_set();
        let mut findings: Vec<String> = Vec::new();

        for rule in &set.in_scope {
            let host: &str = rule.trim_start_matches("*.");
            let host: String = extract_host(host).unwrap_or_else(|| host.to_string());
            if !host.contains('.') && host.parse::<IpAddr>().is_err() {
                findings.push(format!(
                    "\"{rule}\" has no top level domain. The program's scope may be misconfigured"
                ));
            }
        }

        for rule in &set.out_of_scope {
            if SUSPICIOUS_PREFIXES.iter().any(|p| rule.starts_with(p)) {
                findings.push(format!(
                    "Out-of-scope entry \"{rule}\" starts with \"com.\" or \"org.\". The program's scope may be misconfigured"
                ));
            }
        }

        findings
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhiteList {
    #[serde(default, deserialize_with = "nullable")]
    pub regex: String,
    #[serde(default, deserialize_with = "nullable")]
    pub program_slug: String,
}

/// The whole dump as served by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firebounty {
    #[serde(default, deserialize_with = "nullable")]
    pub white_listed: Vec<WhiteList>,
    #[serde(default, deserialize_with = "nullable")]
    pub pgms: Vec<Program>,
}

/// Source of a fresh database dump.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_url(DATABASE_URL)
    }

    pub fn with_url(url: &str) -> anyhow::Result<Self> {
        let client: Client = Client::builder()
            .timeout(Duration::from_secs(300))
            .user_agent(concat!("scoper/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Couldn't build the HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self) -> anyhow::Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Could not download scopes from {}", self.url))?;

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Could not read the response from {}", self.url))?;

        Ok(body.to_vec())
    }
}

/// Why the cached file has to be downloaded again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    Missing,
    Stale,
}

pub fn is_stale(modified: SystemTime, now: SystemTime) -> bool {
    now.duration_since(modified)
        .map(|age| age > MAX_AGE)
        .unwrap_or(false)
}

pub struct Database {
    path: PathBuf,
    data: Firebounty,
}

impl Database {
    /// `<config dir>/scoper`, e.g. `~/.config/scoper` on Linux.
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("scoper"))
            .context("Couldn't determine the user configuration directory. Use --database")
    }

    pub fn file_in(dir: &Path) -> PathBuf {
        dir.join(DATABASE_FILENAME)
    }

    pub fn needs_refresh(path: &Path, now: SystemTime) -> anyhow::Result<Option<Refresh>> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Some(Refresh::Missing)),
            Err(e) => {
                return Err(e).with_context(|| format!("Could not inspect {}", path.display()));
            }
        };

        let modified: SystemTime = metadata
            .modified()
            .with_context(|| format!("Could not read the age of {}", path.display()))?;

        Ok(is_stale(modified, now).then_some(Refresh::Stale))
    }

    /// Downloads a new dump and replaces the file at `path`.
    ///
    /// The download is parsed before anything is written, so a broken
    /// response never replaces a working cache.
    pub async fn refresh(path: &Path, fetcher: &dyn Fetcher) -> anyhow::Result<Self> {
        let body: Vec<u8> = fetcher.fetch().await?;
        let data: Firebounty = serde_json::from_slice(&body)
            .context("The downloaded scope database is not valid JSON")?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Unable to create the folder {}", parent.display()))?;
        }

        tokio::fs::write(path, &body)
            .await
            .with_context(|| format!("Couldn't save the scope database to {}", path.display()))?;

        info!("Scopes file saved to {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let body: Vec<u8> = std::fs::read(path)
            .with_context(|| format!("Couldn't open the scope database {}", path.display()))?;
        let data: Firebounty = serde_json::from_slice(&body)
            .with_context(|| format!("Couldn't parse the scope database {}", path.display()))?;

        debug!("Loaded {} programs from {}", data.pgms.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Opens the database in `dir`, downloading it first when missing or stale.
    pub async fn load(dir: &Path, fetcher: &dyn Fetcher) -> anyhow::Result<Self> {
        let path: PathBuf = Self::file_in(dir);

        match Self::needs_refresh(&path, SystemTime::now())? {
            Some(Refresh::Missing) => {
                info!("Downloading scopes file and saving in {}", path.display());
                Self::refresh(&path, fetcher).await
            }
            Some(Refresh::Stale) => {
                info!("24 hours have passed since the last update to the local database. Updating...");
                Self::refresh(&path, fetcher).await
            }
            None => Self::open(&path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn programs(&self) -> &[Program] {
        &self.data.pgms
    }

    /// Programs whose name contains `company`, ignoring case, in database order.
    pub fn search(&self, company: &str) -> Vec<&Program> {
        let needle: String = company.to_lowercase();
        self.data
            .pgms
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }
}
