//! Manifest templates and the environment that renders them
//!
//! A [`TemplateEnv`] is handed to the manifest generator explicitly. It
//! resolves a template key to a [`ManifestTemplate`] and renders the
//! individual path strings inside it.

mod catalog;
mod render;

pub use catalog::{ArtifactScope, ArtifactTemplate, ManifestTemplate};
pub use render::render_placeholders;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

/// Named string values available to a template.
pub type TemplateVars = BTreeMap<String, String>;

/// Errors for template lookup and rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("No manifest template for key '{0}'")]
    UnknownTemplate(String),

    #[error("Template '{template}' references undefined variable '{variable}'")]
    MissingVariable { template: String, variable: String },

    #[error("Template '{template}' uses unknown filter '{filter}'")]
    UnknownFilter { template: String, filter: String },

    #[error("Template '{template}' is malformed: {reason}")]
    Parse { template: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    Toml(String),
}

/// Template lookup and rendering capability.
pub trait TemplateEnv {
    /// The manifest template registered under `key`.
    fn manifest_template(&self, key: &str) -> Result<&ManifestTemplate, TemplateError>;

    /// Render one template string; `name` identifies it in errors.
    fn render(&self, name: &str, source: &str, vars: &TemplateVars) -> Result<String, TemplateError>;
}

/// Catalog of manifest templates rendered with `{{ placeholder }}` syntax.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    templates: BTreeMap<String, ManifestTemplate>,
}

#[derive(Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: BTreeMap<String, ManifestTemplate>,
}

impl Environment {
    pub fn new(templates: BTreeMap<String, ManifestTemplate>) -> Self {
        Self { templates }
    }

    /// Parse a TOML document with a `[templates.<key>]` table per template.
    pub fn from_toml_str(contents: &str) -> Result<Self, TemplateError> {
        let file: TemplateFile =
            toml::from_str(contents).map_err(|e| TemplateError::Toml(e.to_string()))?;
        Ok(Self::new(file.templates))
    }

    /// Load templates from a TOML file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Template keys, sorted
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateEnv for Environment {
    fn manifest_template(&self, key: &str) -> Result<&ManifestTemplate, TemplateError> {
        self.templates
            .get(key)
            .ok_or_else(|| TemplateError::UnknownTemplate(key.to_string()))
    }

    fn render(&self, name: &str, source: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
        render_placeholders(name, source, vars)
    }
}
