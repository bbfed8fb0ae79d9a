//! # Star Resolution
//!
//! This module turns raw starred-repository data into the values the
//! templates render from.
//!
//! ## Key Components
//!
//! - **`StarRecord`**: the canonical shape of one starred repository. The
//!   same shape is decoded from the API, written to the snapshot file and
//!   exposed to templates.
//! - **`resolve`**: obtains the records for a run from either the remote API
//!   or the snapshot file, and normalizes them.
//! - **`ResolvedVars`**: records grouped by primary language, with a sorted
//!   list of labels.
//!
//! ## Grouping
//!
//! Grouping is a single stable pass: a record's position inside its group
//! follows its position in the input. Records without a language land in the
//! [`UNCLASSIFIED_LANGUAGE`] group, so every record belongs to exactly one
//! group.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::{Config, StarSource};
use crate::error::{Error, Result};
use crate::github::StarsApi;

/// Label of the group holding records with no primary language.
pub const UNCLASSIFIED_LANGUAGE: &str = "Unclassified";

/// One starred repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Repository name without owner.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Login of the owning account.
    pub owner: String,
    /// Primary language; `None` when the host did not classify it.
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

impl StarRecord {
    /// Group label for this record.
    pub fn language_label(&self) -> &str {
        self.language.as_deref().unwrap_or(UNCLASSIFIED_LANGUAGE)
    }

    /// Canonicalizes fields that hosts report inconsistently.
    ///
    /// Blank languages become `None`, surrounding whitespace is dropped from
    /// the language and description, and blank descriptions and homepages
    /// become `None`.
    pub fn normalize(mut self) -> Self {
        self.language = non_blank(self.language);
        self.description = non_blank(self.description);
        self.homepage = non_blank(self.homepage);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Stars grouped by language, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedVars {
    /// Every record, in resolution order.
    pub repos: Vec<StarRecord>,
    /// Distinct language labels in lexicographic order.
    pub languages: Vec<String>,
    /// Records per language label, each in resolution order.
    pub by_language: BTreeMap<String, Vec<StarRecord>>,
}

impl ResolvedVars {
    /// Groups `records` by language label in one stable pass.
    pub fn new(records: Vec<StarRecord>) -> Self {
        let mut by_language: BTreeMap<String, Vec<StarRecord>> = BTreeMap::new();
        for record in &records {
            by_language
                .entry(record.language_label().to_string())
                .or_default()
                .push(record.clone());
        }

        // BTreeMap keys iterate sorted and unique.
        let languages = by_language.keys().cloned().collect();

        Self {
            repos: records,
            languages,
            by_language,
        }
    }

    /// Records for `language`, or an empty slice for an unknown label.
    pub fn group(&self, language: &str) -> &[StarRecord] {
        self.by_language
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.repos.len()
    }
}

/// Resolves the star records for this run.
///
/// In `api` mode the records are fetched through `api` and, when `persist` is
/// set, written to `snapshot_path`. In `file` mode they are read from
/// `snapshot_path`. Both paths go through the same normalization.
pub fn resolve(
    config: &Config,
    api: &dyn StarsApi,
    snapshot_path: &Path,
    persist: bool,
) -> Result<Vec<StarRecord>> {
    let records = match config.stars.source {
        StarSource::Api => {
            let username = config.stars.username.as_deref().ok_or_else(|| Error::Config {
                message: "stars.username is required when stars.source is 'api'".to_string(),
                hint: None,
            })?;
            info!("Fetching starred repositories for {}", username);
            let records = normalize_all(api.starred(username)?);
            if persist {
                write_snapshot(snapshot_path, &records)?;
                info!(
                    "Persisted {} star(s) to {}",
                    records.len(),
                    snapshot_path.display()
                );
            }
            records
        }
        StarSource::File => {
            info!("Reading star snapshot {}", snapshot_path.display());
            normalize_all(read_snapshot(snapshot_path)?)
        }
    };

    debug!("Resolved {} star record(s)", records.len());
    Ok(records)
}

fn normalize_all(records: Vec<StarRecord>) -> Vec<StarRecord> {
    records.into_iter().map(StarRecord::normalize).collect()
}

/// Reads a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<Vec<StarRecord>> {
    let content = fs::read_to_string(path).map_err(|e| Error::SnapshotRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| Error::SnapshotRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Writes `records` as pretty-printed JSON, creating parent directories.
pub fn write_snapshot(path: &Path, records: &[StarRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
