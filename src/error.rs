//! # Error Handling
//!
//! This module defines the error type shared by every stage of the `starlist`
//! pipeline. It uses `thiserror` to build a single `Error` enum whose variants
//! map one-to-one onto the ways a run can fail:
//!
//! - Fetching stars from the remote API.
//! - Reading a previously persisted star snapshot.
//! - Compiling or rendering a template.
//! - Rendering before any template was compiled.
//! - Writing outside the repository root.
//! - Two generated documents targeting the same path.
//! - Running a `git` command.
//! - Loading or validating configuration.
//!
//! None of these are recovered from locally. Every error travels up to
//! `pipeline::run`, which is the single failure boundary for a run.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for starlist operations
#[derive(Error, Debug)]
pub enum Error {
    /// The remote star listing could not be fetched completely.
    ///
    /// Raised for transport failures, non-success statuses and undecodable
    /// pages alike. No partial result survives this error.
    #[error("Star API fetch failed for {url}: {message}")]
    ApiFetch { url: String, message: String },

    /// The star snapshot file is missing or cannot be parsed.
    #[error("Failed to read star snapshot {}: {message}", path.display())]
    SnapshotRead { path: PathBuf, message: String },

    /// A template source could not be parsed.
    ///
    /// The message carries the template engine's own diagnostic, including the
    /// position of the offending token.
    #[error("Template syntax error in '{name}': {message}")]
    TemplateSyntax { name: String, message: String },

    /// A compiled template failed while rendering against a context.
    #[error("Template render error in '{name}': {message}")]
    TemplateRender { name: String, message: String },

    /// Render was requested before any template was compiled.
    #[error("No template has been compiled")]
    NoTemplateCompiled,

    /// An output path resolved outside the repository root.
    #[error("Refusing to write {}: path is outside of repository root {}", path.display(), root.display())]
    PathEscape { path: PathBuf, root: PathBuf },

    /// Two generated documents resolved to the same target path.
    ///
    /// Distinct language labels can share a filename form (`Visual Basic` and
    /// `visual-basic`), or a language document can land on the overall one.
    #[error("Generated documents collide at {}: '{first}' and '{second}' resolve to the same path", path.display())]
    DuplicateOutput {
        path: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    /// A `git` invocation failed.
    #[error("Git command failed: git {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// The configuration is missing a value or holds an invalid one.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
