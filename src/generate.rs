//! # Document Generation
//!
//! Renders the overall document and one document per language from the
//! resolved stars.
//!
//! Templates go through a single [`TemplateSlot`]: the overall template is
//! compiled and rendered first, then the language template is compiled once
//! and rendered for every language in order. Nothing is returned unless every
//! render succeeds.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::config::{OutputConfig, TemplateFile, LANGUAGE_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::stars::{ResolvedVars, StarRecord};
use crate::template::TemplateSlot;

/// A rendered output document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Target filename, usually relative to the repository root.
    pub filename: PathBuf,
    /// Rendered content; may be empty.
    pub content: Vec<u8>,
}

/// Template source text paired with the name it compiles under
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub name: String,
    pub source: String,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Loads a configured template, resolving relative paths against `root`.
    pub fn read(file: &TemplateFile, root: &Path) -> Result<Self> {
        let path = root.join(&file.path);
        let source = fs::read_to_string(&path).map_err(|e| Error::Config {
            message: format!("cannot read template {}: {}", path.display(), e),
            hint: Some("Check the 'template:' paths in the configuration".to_string()),
        })?;
        Ok(Self::new(file.name.clone(), source))
    }
}

/// Context for the overall template
#[derive(Debug, Serialize)]
pub struct OverallContext<'a> {
    pub repos: &'a [StarRecord],
    pub languages: &'a [String],
    pub by_language: &'a BTreeMap<String, Vec<StarRecord>>,
    pub total: usize,
}

impl<'a> From<&'a ResolvedVars> for OverallContext<'a> {
    fn from(vars: &'a ResolvedVars) -> Self {
        Self {
            repos: &vars.repos,
            languages: &vars.languages,
            by_language: &vars.by_language,
            total: vars.total(),
        }
    }
}

/// Context for the per-language template
#[derive(Debug, Serialize)]
pub struct LanguageContext<'a> {
    pub language: &'a str,
    pub repos: &'a [StarRecord],
    pub total: usize,
}

/// Renders every output document for `vars`.
///
/// Returns the overall document followed by one document per language, in
/// the order of `vars.languages`.
pub fn generate(
    vars: &ResolvedVars,
    overall: &TemplateSource,
    language: &TemplateSource,
    output: &OutputConfig,
) -> Result<Vec<GeneratedFile>> {
    let mut slot = TemplateSlot::new();
    let mut files = Vec::with_capacity(vars.languages.len() + 1);

    slot.compile(&overall.source, &overall.name)?;
    let rendered = slot.render(&OverallContext::from(vars))?;
    files.push(GeneratedFile {
        filename: output.overall_filename.clone(),
        content: rendered.into_bytes(),
    });

    slot.compile(&language.source, &language.name)?;
    for label in &vars.languages {
        let repos = vars.group(label);
        let rendered = slot.render(&LanguageContext {
            language: label,
            repos,
            total: repos.len(),
        })?;
        files.push(GeneratedFile {
            filename: language_filename(&output.language_filepattern, label),
            content: rendered.into_bytes(),
        });
    }

    debug!("Rendered {} document(s)", files.len());
    Ok(files)
}

/// Output filename for `language` under `pattern`.
pub fn language_filename(pattern: &str, language: &str) -> PathBuf {
    PathBuf::from(pattern.replacen(LANGUAGE_PLACEHOLDER, &language_slug(language), 1))
}

/// Filename form of a language label: lowercase, with whitespace and path
/// separators turned into `-`.
pub fn language_slug(language: &str) -> String {
    language
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}
