//! # Version Control
//!
//! The pipeline only needs a handful of working-copy operations, collected in
//! the [`VersionControl`] trait so tests can substitute a recording mock.
//!
//! [`SystemGit`] implements the trait with the system `git` command, which
//! picks up whatever credentials the host has configured (credential helpers,
//! SSH keys, tokens injected by the CI runner).

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;

use crate::config::GitConfig;
use crate::error::{Error, Result};

/// Trait for git operations - allows mocking in tests
pub trait VersionControl {
    /// Absolute path of the working copy root.
    fn root(&self) -> &Path;

    /// Applies repository-local settings such as the committer identity.
    fn setup(&self, config: &GitConfig) -> Result<()>;

    /// Updates the working copy from its upstream.
    fn pull(&self, flags: &[String]) -> Result<()>;

    /// Short status of the working copy, for logging.
    fn status(&self) -> Result<String>;

    /// Stages `path`.
    fn add(&self, path: &Path) -> Result<()>;

    /// Whether the index differs from `HEAD`.
    fn has_staged_changes(&self) -> Result<bool>;

    /// Commits the index with `message`.
    fn commit(&self, message: &str) -> Result<()>;

    /// Pushes the current branch to its upstream.
    fn push(&self) -> Result<()>;
}

/// `VersionControl` backed by the system `git` command
#[derive(Debug, Clone)]
pub struct SystemGit {
    root: PathBuf,
}

impl SystemGit {
    /// Opens the working copy containing `dir`.
    ///
    /// The root is taken from `git rev-parse --show-toplevel` and
    /// canonicalized so containment checks compare like with like.
    pub fn open(dir: &Path) -> Result<Self> {
        let output = run(dir, &["rev-parse", "--show-toplevel"])?;
        let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let root = PathBuf::from(toplevel).canonicalize()?;
        debug!("Opened git working copy at {}", root.display());
        Ok(Self { root })
    }

    fn git<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<Output> {
        run(&self.root, args)
    }
}

/// Runs `git <args>` in `dir`, failing on a non-zero exit.
///
/// Arguments are passed through unchanged, so paths need not be UTF-8; the
/// lossy form only appears in logs and errors.
fn run<S: AsRef<OsStr>>(dir: &Path, args: &[S]) -> Result<Output> {
    let command = args
        .iter()
        .map(|arg| arg.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    debug!("git {}", command);

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command.clone(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GitCommand {
            command,
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(output)
}

impl VersionControl for SystemGit {
    fn root(&self) -> &Path {
        &self.root
    }

    fn setup(&self, config: &GitConfig) -> Result<()> {
        if let Some(name) = &config.user_name {
            self.git(&["config", "user.name", name.as_str()])?;
        }
        if let Some(email) = &config.user_email {
            self.git(&["config", "user.email", email.as_str()])?;
        }
        Ok(())
    }

    fn pull(&self, flags: &[String]) -> Result<()> {
        let mut args = vec!["pull"];
        args.extend(flags.iter().map(String::as_str));
        self.git(&args)?;
        Ok(())
    }

    fn status(&self) -> Result<String> {
        let output = self.git(&["status", "--short", "--branch"])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn add(&self, path: &Path) -> Result<()> {
        self.git(&[OsStr::new("add"), OsStr::new("--"), path.as_os_str()])?;
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        // `diff --quiet` exits 1 when there are differences.
        let output = Command::new("git")
            .args(["diff", "--cached", "--quiet"])
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::GitCommand {
                command: "diff --cached --quiet".to_string(),
                stderr: e.to_string(),
            })?;

        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Error::GitCommand {
                command: "diff --cached --quiet".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message])?;
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.git(&["push"])?;
        Ok(())
    }
}
