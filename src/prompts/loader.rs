//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults.

use std::path::PathBuf;

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::embedded;

/// Name of the partial holding the campaign parameter block
const PARAMS_PARTIAL: &str = "params";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt template not found: {0}")]
    NotFound(String),

    #[error("Failed to read prompt {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid prompt template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Failed to render prompt: {0}")]
    Render(#[from] Box<handlebars::RenderError>),
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    hbs: Handlebars<'static>,
    /// Directory of `{name}.pmt` overrides
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates from `override_dir`
    pub fn new(override_dir: Option<PathBuf>) -> Result<Self, PromptError> {
        let override_dir = override_dir.filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                warn!("Prompt override directory {} does not exist, using embedded prompts", dir.display());
            }
            exists
        });
        let mut loader = Self {
            hbs: Self::engine(),
            override_dir,
        };
        let params = loader.load_template(PARAMS_PARTIAL)?;
        loader
            .hbs
            .register_partial(PARAMS_PARTIAL, params)
            .map_err(|e| PromptError::Template(Box::new(e)))?;
        Ok(loader)
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        let mut hbs = Self::engine();
        if let Err(e) = hbs.register_partial(PARAMS_PARTIAL, embedded::PARAMS_PARTIAL) {
            warn!("Embedded params partial failed to register: {}", e);
        }
        Self { hbs, override_dir: None }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks `{override_dir}/{name}.pmt` first, then the embedded fallback.
    pub fn load_template(&self, name: &str) -> Result<String, PromptError> {
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from override: {:?}", path);
                return std::fs::read_to_string(&path).map_err(|source| PromptError::Io { path, source });
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(PromptError::NotFound(name.to_string()))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String, PromptError> {
        let template = self.load_template(template_name)?;
        debug!("Rendering template '{}'", template_name);
        self.hbs
            .render_template(&template, context)
            .map_err(|e| PromptError::Render(Box::new(e)))
    }
}
