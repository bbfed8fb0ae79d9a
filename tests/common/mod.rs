//! Shared test utilities for CLI E2E tests.
//!
//! This module provides a fixture that builds a throwaway git working copy
//! (with a bare `origin` to push to), the templates a run needs, and helpers
//! for writing configuration and star snapshots.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config(configs::FILE_MODE);
//!     fixture.command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Reads stars from the snapshot and commits as a fixed identity.
    pub const FILE_MODE: &str = r#"
stars:
  source: file
  filename: data/stars.json
output:
  overall_filename: README.md
  language_filepattern: "stars-%s.md"
git:
  commit_message: "chore: update starred repositories"
  user_name: Star Bot
  user_email: bot@example.com
"#;

    /// Language documents would land outside the working copy.
    pub const ESCAPING_PATTERN: &str = r#"
stars:
  source: file
output:
  language_filepattern: "../escape-%s.md"
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "stars: [unclosed";
}

/// Overall template used by every fixture.
pub const OVERALL_TEMPLATE: &str =
    "# Stars ({{ total }})\n{% for l in languages %}- {{ l }}: {{ by_language[l] | length }}\n{% endfor %}";

/// Per-language template used by every fixture.
pub const LANGUAGE_TEMPLATE: &str =
    "# {{ language }}\n{% for r in repos %}- [{{ r.full_name }}]({{ r.html_url }})\n{% endfor %}";

/// A snapshot with the records `a` (Go), `b` (Rust) and `c` (Go).
pub const SAMPLE_SNAPSHOT: &str = r#"[
  {"name": "a", "full_name": "octocat/a", "owner": "octocat", "language": "Go", "html_url": "https://github.com/octocat/a"},
  {"name": "b", "full_name": "octocat/b", "owner": "octocat", "language": "Rust", "html_url": "https://github.com/octocat/b"},
  {"name": "c", "full_name": "octocat/c", "owner": "octocat", "language": "Go", "html_url": "https://github.com/octocat/c"}
]
"#;

/// Runs git with a fixed identity, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=Fixture", "-c", "user.email=fixture@example.com"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A temporary git working copy with a bare `origin`.
///
/// The working copy lives in `work/` and already contains one commit with
/// the templates, pushed to `remote.git/`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create the working copy, remote and templates.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let remote = temp_dir.path().join("remote.git");
        let work = temp_dir.path().join("work");

        git(temp_dir.path(), &["init", "--quiet", "--bare", "remote.git"]);
        git(temp_dir.path(), &["init", "--quiet", "work"]);

        let fixture = Self { temp_dir };
        fixture
            .work_child("templates/overall.md")
            .write_str(OVERALL_TEMPLATE)
            .expect("Failed to write template");
        fixture
            .work_child("templates/language.md")
            .write_str(LANGUAGE_TEMPLATE)
            .expect("Failed to write template");

        git(&work, &["add", "templates"]);
        git(&work, &["commit", "--quiet", "-m", "initial"]);
        git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
        git(&work, &["push", "--quiet", "-u", "origin", "HEAD"]);
        fixture
    }

    /// Write `.starlist.yaml` into the working copy.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file(".starlist.yaml", content)
    }

    /// Write the sample snapshot to `data/stars.json`.
    #[allow(dead_code)]
    pub fn with_sample_snapshot(self) -> Self {
        self.with_file("data/stars.json", SAMPLE_SNAPSHOT)
    }

    /// Add a file inside the working copy.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.work_child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// The git working copy.
    pub fn work(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    /// Root of the temporary directory (parent of the working copy).
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The bare remote.
    pub fn remote(&self) -> PathBuf {
        self.temp_dir.path().join("remote.git")
    }

    /// Create a child path in the working copy.
    pub fn work_child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child("work").child(path)
    }

    /// Subject of the latest commit on the remote.
    #[allow(dead_code)]
    pub fn remote_head_subject(&self) -> String {
        git(&self.remote(), &["log", "-1", "--format=%s"])
            .trim()
            .to_string()
    }

    /// Create a command running in the working copy with a clean environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("starlist");
        cmd.current_dir(self.work())
            .env_remove("RUST_LOG")
            .env_remove("STARLIST_CONFIG")
            .env_remove("GITHUB_TOKEN");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_pushed_working_copy() {
        let fixture = TestFixture::new();
        assert!(fixture.work().join(".git").exists());
        assert!(fixture.work().join("templates/overall.md").exists());
        assert_eq!(fixture.remote_head_subject(), "initial");
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [configs::FILE_MODE, configs::ESCAPING_PATTERN] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }

    #[test]
    fn test_sample_snapshot_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(SAMPLE_SNAPSHOT).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
    }
}
