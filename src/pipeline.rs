//! # Pipeline Orchestration
//!
//! [`run`] executes one complete pass:
//!
//! 1.  **Prepare**: apply git settings, pull, log the status.
//! 2.  **Resolve**: fetch or read the star records. In `api` mode the
//!     persisted snapshot is staged right away.
//! 3.  **Generate**: render the overall and per-language documents in memory.
//! 4.  **Materialize**: containment-check, write and stage every document.
//! 5.  **Publish**: commit and push when the index holds changes.
//!
//! `run` is the failure boundary for the whole pass. Any stage error stops
//! the pass and is returned unchanged; nothing after the failing stage runs,
//! so documents are never written unless all of them rendered and a commit is
//! never made unless every file was staged.
//!
//! In dry-run mode steps 1, 4 and 5 are reduced to containment checks: no
//! file is written and no git command that mutates the working copy runs.

use std::path::PathBuf;

use log::{debug, info};

use crate::config::{Config, StarSource};
use crate::error::Result;
use crate::generate::{generate, TemplateSource};
use crate::git::VersionControl;
use crate::github::StarsApi;
use crate::materialize::{contained_path, materialize, plan, resolve_path};
use crate::stars::{self, ResolvedVars};

/// Options that change how a pass behaves, independent of configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Resolve and render, but write nothing and skip git mutations.
    pub dry_run: bool,
}

/// What a completed pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of star records resolved.
    pub stars: usize,
    /// Number of distinct language labels.
    pub languages: usize,
    /// Absolute paths of the generated documents, in generation order.
    pub files: Vec<PathBuf>,
    /// Whether a commit was created and pushed.
    pub committed: bool,
}

/// Runs one pipeline pass.
pub fn run(
    config: &Config,
    vcs: &dyn VersionControl,
    api: &dyn StarsApi,
    options: RunOptions,
) -> Result<RunSummary> {
    let root = vcs.root().to_path_buf();
    let dry_run = options.dry_run;

    if !dry_run {
        vcs.setup(&config.git)?;
        vcs.pull(&config.git.pull_flags)?;
        log_status(vcs)?;
    }

    // Only a snapshot that is about to be written has to stay inside the root.
    let persist = config.stars.source == StarSource::Api && !dry_run;
    let snapshot_path = if persist {
        contained_path(&root, &config.stars.filename)?
    } else {
        resolve_path(&root, &config.stars.filename)
    };
    let records = stars::resolve(config, api, &snapshot_path, persist)?;

    if persist {
        vcs.add(&snapshot_path)?;
        log_status(vcs)?;
    }

    let vars = ResolvedVars::new(records);
    info!(
        "Resolved {} star(s) across {} language(s)",
        vars.total(),
        vars.languages.len()
    );

    let overall = TemplateSource::read(&config.template.overall, &root)?;
    let language = TemplateSource::read(&config.template.language, &root)?;
    let documents = generate(&vars, &overall, &language, &config.output)?;

    let mut summary = RunSummary {
        stars: vars.total(),
        languages: vars.languages.len(),
        files: Vec::new(),
        committed: false,
    };

    if dry_run {
        summary.files = plan(&root, &documents)?;
        for path in &summary.files {
            info!("Would write {}", path.display());
        }
        return Ok(summary);
    }

    summary.files = materialize(vcs, &documents)?;
    log_status(vcs)?;

    if vcs.has_staged_changes()? {
        vcs.commit(&config.git.commit_message)?;
        log_status(vcs)?;
        vcs.push()?;
        log_status(vcs)?;
        summary.committed = true;
        info!("Committed and pushed {} file(s)", summary.files.len());
    } else {
        info!("Generated files are unchanged; nothing to commit");
    }

    Ok(summary)
}

fn log_status(vcs: &dyn VersionControl) -> Result<()> {
    let status = vcs.status()?;
    debug!("git status:\n{}", status.trim_end());
    Ok(())
}
