//! CLI argument parsing and execution

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};

use starlist::config::{self, StarSource};
use starlist::git::SystemGit;
use starlist::github::GitHubClient;
use starlist::pipeline::{self, RunOptions};

/// Starlist - Render starred repositories into per-language listings
#[derive(Parser, Debug)]
#[command(name = "starlist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "STARLIST_CONFIG",
        default_value = ".starlist.yaml"
    )]
    pub config: PathBuf,

    /// Directory inside the target git working copy (defaults to current directory)
    #[arg(long, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// API token used to list stars
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override the configured star source
    #[arg(long, value_enum, value_name = "SOURCE")]
    pub source: Option<StarSource>,

    /// Resolve and render without writing files or touching git
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Initializes `env_logger`; `RUST_LOG` takes precedence over `--log-level`.
    pub fn init_logging(&self) {
        let filter = self.log_level.to_string().to_lowercase();
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
            .format_timestamp(None)
            .init();
    }

    /// Runs one pipeline pass.
    pub fn execute(self) -> Result<()> {
        let start_time = Instant::now();
        info!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

        let config = config::load(&self.config, self.source)
            .with_context(|| format!("Invalid configuration in {}", self.config.display()))?;
        info!(
            "Loaded configuration from {} (source: {:?})",
            self.config.display(),
            config.stars.source
        );
        debug!("Resolved configuration: {:?}", config);

        let repo_dir = match self.repo {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        let vcs = SystemGit::open(&repo_dir)
            .with_context(|| format!("{} is not inside a git working copy", repo_dir.display()))?;
        let api = GitHubClient::new(&config.api, self.token);

        let summary = pipeline::run(
            &config,
            &vcs,
            &api,
            RunOptions {
                dry_run: self.dry_run,
            },
        )
        .context("Star listing run failed")?;

        info!(
            "Finished in {:.2}s: {} star(s), {} language(s), {} file(s){}",
            start_time.elapsed().as_secs_f64(),
            summary.stars,
            summary.languages,
            summary.files.len(),
            if summary.committed { ", committed" } else { "" }
        );
        Ok(())
    }
}
