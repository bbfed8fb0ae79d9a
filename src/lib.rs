//! # Starlist Library
//!
//! This library renders a GitHub user's starred repositories into markdown
//! listings (one overall document plus one per primary language) and commits
//! them into a git working copy. It backs the `starlist` command-line tool,
//! which is meant to run from a scheduler once per invocation.
//!
//! ## Quick Example
//!
//! ```
//! use starlist::generate::{generate, TemplateSource};
//! use starlist::config::OutputConfig;
//! use starlist::stars::{ResolvedVars, StarRecord};
//!
//! let star = |name: &str, language: Option<&str>| StarRecord {
//!     name: name.to_string(),
//!     full_name: format!("octocat/{}", name),
//!     owner: "octocat".to_string(),
//!     language: language.map(str::to_string),
//!     description: None,
//!     html_url: format!("https://github.com/octocat/{}", name),
//!     homepage: None,
//!     stargazers_count: 0,
//!     forks_count: 0,
//!     topics: Vec::new(),
//!     archived: false,
//!     fork: false,
//! };
//!
//! let vars = ResolvedVars::new(vec![star("a", Some("Go")), star("b", Some("Rust"))]);
//! assert_eq!(vars.languages, vec!["Go", "Rust"]);
//!
//! let overall = TemplateSource::new("overall", "{{ total }} stars");
//! let language = TemplateSource::new("language", "{{ language }}");
//! let files = generate(&vars, &overall, &language, &OutputConfig::default()).unwrap();
//! assert_eq!(files.len(), 3);
//! assert_eq!(files[0].content, b"2 stars");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the typed `.starlist.yaml` schema.
//! - **Star resolution (`stars`, `github`)**: fetching stars from the API or a
//!   snapshot file, normalizing them and grouping them by language.
//! - **Templates (`template`)**: compiling and rendering Tera templates.
//! - **Generation (`generate`)**: producing the in-memory document set.
//! - **Materialization (`materialize`)**: writing documents inside the
//!   repository root and staging them.
//! - **Version control (`git`)**: the working-copy operations the pipeline
//!   needs, backed by the system `git` command.
//!
//! ## Execution Flow
//!
//! `pipeline::run` executes one pass: prepare the working copy, resolve
//! stars, render documents, write and stage them, then commit and push. It
//! returns a single `Result`, which is the only failure boundary.

pub mod config;
pub mod error;
pub mod generate;
pub mod git;
pub mod github;
pub mod materialize;
pub mod pipeline;
pub mod stars;
pub mod template;

#[cfg(test)]
mod grouping_proptest;
