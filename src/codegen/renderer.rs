//! The template-renderer capability and its Tera implementation.
//!
//! Rendering is file-based: the caller names a template and supplies an
//! ordered list of directories to search, and the first directory containing
//! the file wins. The generator uses this to let a major-version template
//! family share files while an exact-version directory supplies the ones the
//! family lacks.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use tera::Tera;

/// Error raised by a renderer.
#[derive(Debug)]
pub enum RenderError {
    /// The named template exists in none of the searched directories.
    TemplateNotFound { name: String, searched: Vec<PathBuf> },
    /// The engine rejected the template or its input.
    Engine(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateNotFound { name, searched } => {
                let dirs: Vec<String> = searched
                    .iter()
                    .map(|dir| dir.display().to_string())
                    .collect();
                write!(
                    f,
                    "Template '{}' not found in any of: {}",
                    name,
                    dirs.join(", ")
                )
            }
            RenderError::Engine(message) => write!(f, "Template engine error: {}", message),
        }
    }
}

impl std::error::Error for RenderError {}

/// Capability to render a named template against a variable bag.
///
/// Implementations must honor the search-path order: the first directory
/// containing `name` provides the template.
pub trait TemplateRenderer {
    fn render(
        &self,
        name: &str,
        search_paths: &[PathBuf],
        vars: &HashMap<String, Value>,
    ) -> Result<String, RenderError>;
}

/// File-based [`TemplateRenderer`] backed by the Tera engine.
///
/// Each render is a one-shot compile of the resolved file with autoescaping
/// off, since the output is source code rather than markup.
#[derive(Debug, Default)]
pub struct TeraRenderer;

impl TeraRenderer {
    pub fn new() -> Self {
        TeraRenderer
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(
        &self,
        name: &str,
        search_paths: &[PathBuf],
        vars: &HashMap<String, Value>,
    ) -> Result<String, RenderError> {
        let path = search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| RenderError::TemplateNotFound {
                name: name.to_string(),
                searched: search_paths.to_vec(),
            })?;

        let template = fs::read_to_string(&path).map_err(|e| {
            RenderError::Engine(format!("Failed to read template {}: {}", path.display(), e))
        })?;

        let mut context = tera::Context::new();
        for (key, value) in vars {
            context.insert(key.as_str(), value);
        }
        Tera::one_off(&template, &context, false)
            .map_err(|e| RenderError::Engine(format!("{}: {}", path.display(), e)))
    }
}
