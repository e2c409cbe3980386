//! Rent data provider.
//!
//! Loads the zip index and every per-state file once, then hands out
//! read-only views. Consumers share one `Arc<RentData>`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wreq::Client;

use crate::geo::{self, StateIndex, StateSummary};
use crate::types::{CityData, ZipEntry};
use crate::zipcode::ZipIndex;

pub const DEFAULT_DATA_DIR: &str = "public/data";
pub const ZIP_INDEX_FILE: &str = "zip_index.json";
pub const GEO_DIR: &str = "geo";

/// Where the rent data lives
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Directory holding `zip_index.json` and `geo/{state}.json`
    pub data_dir: PathBuf,
    /// Fetch the zip index from here instead of `data_dir`
    pub zip_index_url: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            zip_index_url: None,
        }
    }
}

impl DataConfig {
    pub fn zip_index_path(&self) -> PathBuf {
        self.data_dir.join(ZIP_INDEX_FILE)
    }

    pub fn geo_dir(&self) -> PathBuf {
        self.data_dir.join(GEO_DIR)
    }
}

/// Immutable snapshot of all rent data
#[derive(Debug, Default)]
pub struct RentData {
    zip_index: Option<ZipIndex>,
    states: HashMap<String, StateIndex>,
}

impl RentData {
    pub fn new(zip_index: Option<ZipIndex>, states: impl IntoIterator<Item = StateIndex>) -> Self {
        Self {
            zip_index,
            states: states
                .into_iter()
                .map(|s| (s.slug().to_string(), s))
                .collect(),
        }
    }

    /// Load everything once.
    ///
    /// Never fails: a zip index that cannot be loaded leaves lookups "not
    /// ready", and unreadable state files are skipped. Both are logged.
    pub async fn load(config: &DataConfig) -> Self {
        let zip_index = match &config.zip_index_url {
            Some(url) => fetch_zip_index(url).await,
            None => load_zip_index(&config.zip_index_path()).await,
        };
        let zip_index = match zip_index {
            Ok(index) => {
                tracing::info!("Zip index loaded with {} zip codes", index.len());
                Some(index)
            }
            Err(e) => {
                tracing::error!("Failed to load zip index: {:#}", e);
                None
            }
        };

        let states = match load_states(&config.geo_dir()).await {
            Ok(states) => states,
            Err(e) => {
                tracing::error!("Failed to load state data: {:#}", e);
                Vec::new()
            }
        };
        tracing::info!("Loaded {} state files", states.len());

        Self::new(zip_index, states)
    }

    /// `None` until a zip index has been loaded
    pub fn zip_index(&self) -> Option<&ZipIndex> {
        self.zip_index.as_ref()
    }

    pub fn state(&self, state: &str) -> Option<&StateIndex> {
        self.states.get(&geo::sanitize_slug(state))
    }

    /// City slugs are plain map keys and are matched as given
    pub fn city(&self, state: &str, city: &str) -> Option<&CityData> {
        self.state(state)?.city(city)
    }

    /// Every catalogued state, with the number of cities we have data for
    pub fn state_summaries(&self) -> Vec<StateSummary> {
        geo::STATES
            .iter()
            .map(|(slug, abbrev)| StateSummary {
                slug: slug.to_string(),
                name: geo::display_name(slug),
                abbreviation: abbrev.to_string(),
                cities: self.states.get(*slug).map(StateIndex::len).unwrap_or(0),
            })
            .collect()
    }
}

/// Read the zip index from a local JSON file
pub async fn load_zip_index(path: &Path) -> Result<ZipIndex> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ZipIndex::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Fetch the zip index over HTTP, once, without retries
pub async fn fetch_zip_index(url: &str) -> Result<ZipIndex> {
    tracing::info!("Fetching zip index from {}", url);
    let client = Client::builder()
        .gzip(true)
        .brotli(true)
        .zstd(true)
        .build()
        .context("Failed to build HTTP client")?;

    let raw: HashMap<String, ZipEntry> = client
        .get(url)
        .send()
        .await
        .context("Zip index request failed")?
        .error_for_status()
        .context("Zip index request returned an error status")?
        .json()
        .await
        .context("Failed to decode zip index")?;

    Ok(ZipIndex::from_map(raw))
}

/// Read every `{state}.json` in `geo_dir` concurrently.
///
/// A file that fails to read or parse is logged and skipped.
pub async fn load_states(geo_dir: &Path) -> Result<Vec<StateIndex>> {
    let mut dir = tokio::fs::read_dir(geo_dir)
        .await
        .with_context(|| format!("Failed to list {}", geo_dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        files.push((geo::sanitize_slug(stem), path));
    }

    let loads = files.into_iter().map(|(slug, path)| async move {
        let parsed = load_state_file(&slug, &path).await;
        (path, parsed)
    });

    let mut states = Vec::new();
    for (path, parsed) in futures::future::join_all(loads).await {
        match parsed {
            Ok(state) => states.push(state),
            Err(e) => tracing::warn!("Skipping {}: {:#}", path.display(), e),
        }
    }
    Ok(states)
}

async fn load_state_file(slug: &str, path: &Path) -> Result<StateIndex> {
    let json = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read state file")?;
    StateIndex::from_json(slug, &json).context("Failed to parse state file")
}
