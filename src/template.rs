//! # Template Engine
//!
//! Thin layer over [`tera`] with the compile/render contract the document
//! generator relies on.
//!
//! [`compile`] parses a template source into a [`CompiledTemplate`] tagged
//! with a name. A [`TemplateSlot`] holds at most one compiled template at a
//! time: compiling into it replaces whatever it held, and rendering from an
//! empty slot fails with [`Error::NoTemplateCompiled`]. The slot is an
//! ordinary value owned by its caller, so there is no shared state between
//! independent generation passes.
//!
//! Autoescaping is off: every output is markdown.

use std::error::Error as StdError;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{Error, Result};

/// A parsed, render-ready template bound to one source
#[derive(Debug)]
pub struct CompiledTemplate {
    name: String,
    tera: Tera,
}

impl CompiledTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders this template against `context`.
    ///
    /// Output depends only on the template and the context.
    pub fn render<C: Serialize>(&self, context: &C) -> Result<String> {
        let context = Context::from_serialize(context).map_err(|e| self.render_error(&e))?;
        self.tera
            .render(&self.name, &context)
            .map_err(|e| self.render_error(&e))
    }

    fn render_error(&self, error: &tera::Error) -> Error {
        Error::TemplateRender {
            name: self.name.clone(),
            message: describe(error),
        }
    }
}

/// Parses `source` into a template tagged `name`.
pub fn compile(source: &str, name: &str) -> Result<CompiledTemplate> {
    let mut tera = Tera::default();
    tera.autoescape_on(Vec::new());
    tera.add_raw_template(name, source)
        .map_err(|e| Error::TemplateSyntax {
            name: name.to_string(),
            message: describe(&e),
        })?;

    Ok(CompiledTemplate {
        name: name.to_string(),
        tera,
    })
}

/// Holder for the current compiled template
#[derive(Debug, Default)]
pub struct TemplateSlot {
    current: Option<CompiledTemplate>,
}

impl TemplateSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `source` and makes it the current template.
    ///
    /// On a syntax error the previously held template is left in place.
    pub fn compile(&mut self, source: &str, name: &str) -> Result<&CompiledTemplate> {
        let compiled = self.current.insert(compile(source, name)?);
        Ok(&*compiled)
    }

    /// Renders the current template against `context`.
    pub fn render<C: Serialize>(&self, context: &C) -> Result<String> {
        self.current
            .as_ref()
            .ok_or(Error::NoTemplateCompiled)?
            .render(context)
    }

    pub fn current(&self) -> Option<&CompiledTemplate> {
        self.current.as_ref()
    }
}

/// Flattens a tera error and its sources into one line.
///
/// Tera reports the useful part (line, column, expected tokens) in the
/// source chain rather than in the top-level message.
fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(text.trim());
        }
        source = cause.source();
    }
    message
}
