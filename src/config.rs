//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the `.starlist.yaml`
//! configuration file and the logic for loading and validating it.
//!
//! Every recognized option is a typed field with a default, so a partial file
//! (or an empty one) is valid input. Validation happens once, in
//! [`Config::validate`], right after parsing; the rest of the pipeline reads
//! plain fields and never re-checks them.
//!
//! Secrets are absent from the schema: the API token is supplied
//! on the command line or through `GITHUB_TOKEN`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder in [`OutputConfig::language_filepattern`] replaced by the
/// language label.
pub const LANGUAGE_PLACEHOLDER: &str = "%s";

/// Where star records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StarSource {
    /// Query the remote API and persist a snapshot afterwards.
    #[default]
    Api,
    /// Read a previously persisted snapshot.
    File,
}

/// Star acquisition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarsConfig {
    /// Source mode.
    pub source: StarSource,
    /// Snapshot file, relative to the repository root.
    pub filename: PathBuf,
    /// Account whose stars are listed. Required in `api` mode.
    pub username: Option<String>,
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            source: StarSource::Api,
            filename: PathBuf::from("data/stars.json"),
            username: None,
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the REST API.
    pub base_url: String,
    /// Page size requested from the listing endpoint (1-100).
    pub per_page: u32,
    /// Upper bound on pages fetched in one run.
    pub max_pages: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            per_page: 100,
            max_pages: 100,
            timeout_secs: 30,
        }
    }
}

/// A template file and the name it is compiled under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateFile {
    /// Path to the template source, relative to the repository root.
    pub path: PathBuf,
    /// Name the compiled template is tagged with (shown in diagnostics).
    pub name: String,
}

/// Template settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Template rendered once against every star.
    pub overall: TemplateFile,
    /// Template rendered once per language.
    pub language: TemplateFile,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            overall: TemplateFile {
                path: PathBuf::from("templates/overall.md"),
                name: "overall".to_string(),
            },
            language: TemplateFile {
                path: PathBuf::from("templates/language.md"),
                name: "language".to_string(),
            },
        }
    }
}

/// Output file naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Filename of the overall document.
    pub overall_filename: PathBuf,
    /// Filename pattern for per-language documents; must contain `%s` once.
    pub language_filepattern: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overall_filename: PathBuf::from("README.md"),
            language_filepattern: "languages/%s.md".to_string(),
        }
    }
}

/// Git settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Extra flags passed to `git pull`.
    pub pull_flags: Vec<String>,
    /// Commit message for the generated changes.
    pub commit_message: String,
    /// Committer name, set with `git config` when present.
    pub user_name: Option<String>,
    /// Committer email, set with `git config` when present.
    pub user_email: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            pull_flags: Vec::new(),
            commit_message: "chore: update starred repositories".to_string(),
            user_name: None,
            user_email: None,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub stars: StarsConfig,
    pub api: ApiConfig,
    pub template: TemplateConfig,
    pub output: OutputConfig,
    pub git: GitConfig,
}

impl Config {
    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.stars.source == StarSource::Api {
            let missing = self
                .stars
                .username
                .as_deref()
                .map(|u| u.trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(config_error(
                    "stars.username is required when stars.source is 'api'",
                    Some("Set 'username:' under 'stars:' or use '--source file'"),
                ));
            }
        }

        if self.stars.filename.as_os_str().is_empty() {
            return Err(config_error("stars.filename must not be empty", None));
        }

        if !(1..=100).contains(&self.api.per_page) {
            return Err(config_error(
                format!("api.per_page must be between 1 and 100, got {}", self.api.per_page),
                None,
            ));
        }

        if self.api.max_pages == 0 {
            return Err(config_error("api.max_pages must be at least 1", None));
        }

        url::Url::parse(&self.api.base_url)?;

        for template in [&self.template.overall, &self.template.language] {
            if template.name.trim().is_empty() {
                return Err(config_error(
                    format!("template name for {} must not be empty", template.path.display()),
                    None,
                ));
            }
        }

        if self.output.overall_filename.as_os_str().is_empty() {
            return Err(config_error("output.overall_filename must not be empty", None));
        }

        let placeholders = self
            .output
            .language_filepattern
            .matches(LANGUAGE_PLACEHOLDER)
            .count();
        if placeholders != 1 {
            return Err(config_error(
                format!(
                    "output.language_filepattern must contain '{}' exactly once, found {}",
                    LANGUAGE_PLACEHOLDER, placeholders
                ),
                Some("Use a pattern such as 'languages/%s.md'"),
            ));
        }

        if self.git.commit_message.trim().is_empty() {
            return Err(config_error("git.commit_message must not be empty", None));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>, hint: Option<&str>) -> Error {
    Error::Config {
        message: message.into(),
        hint: hint.map(str::to_string),
    }
}

/// Parses and validates a YAML configuration string.
///
/// An empty document yields the default configuration, which still has to
/// pass validation.
pub fn parse(yaml_content: &str) -> Result<Config> {
    let config = deserialize(yaml_content)?;
    config.validate()?;
    Ok(config)
}

fn deserialize(yaml_content: &str) -> Result<Config> {
    if yaml_content.trim().is_empty() {
        Ok(Config::default())
    } else {
        Ok(serde_yaml::from_str(yaml_content)?)
    }
}

/// Parse a Config from a YAML file path
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    load(path, None)
}

/// Loads a configuration file, applying a source-mode override before
/// validation.
pub fn load<P: AsRef<Path>>(path: P, source: Option<StarSource>) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: None,
    })?;
    let mut config = deserialize(&content)?;
    if let Some(source) = source {
        config.stars.source = source;
    }
    config.validate()?;
    Ok(config)
}
