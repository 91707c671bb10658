//! Artifact generation.
//!
//! [`Builder`] walks a resolved [`Schema`] and emits two artifacts per table
//! through a [`TemplateRenderer`]: a base artifact that is regenerated on
//! every run, and a user artifact that is written once and never touched
//! again. Artifact names carry no extension; the template set decides the
//! output language.

pub mod renderer;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use crate::schema::{Schema, Table};
use renderer::{RenderError, TemplateRenderer};

/// Version tag stamped into rendered artifacts and used to pick the
/// template directories.
pub const GENERATOR_VERSION: &str = "2.00";

/// Template rendered into the base artifact on every run.
pub const BASE_TEMPLATE: &str = "base.tera";

/// Template rendered into the user artifact when it does not exist yet.
pub const USER_TEMPLATE: &str = "user.tera";

/// Error raised during generation.
#[derive(Debug)]
pub enum GenerationError {
    /// The output directory is missing, not a directory, or read-only.
    /// Checked up front, before any artifact is written.
    TargetNotWritable(PathBuf),
    Render(RenderError),
    Write { path: PathBuf, message: String },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::TargetNotWritable(path) => {
                write!(
                    f,
                    "Output directory '{}' does not exist or is not writable",
                    path.display()
                )
            }
            GenerationError::Render(err) => write!(f, "{}", err),
            GenerationError::Write { path, message } => {
                write!(f, "Failed to write '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<RenderError> for GenerationError {
    fn from(err: RenderError) -> Self {
        GenerationError::Render(err)
    }
}

/// What one generation run produced.
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Artifacts written this run, base and user alike.
    pub written: Vec<PathBuf>,
    /// User artifacts left alone because they already existed.
    pub skipped: Vec<PathBuf>,
}

/// Per-table artifact generator.
///
/// Templates are looked up through two directories under `templates_root`:
/// the major-version directory first, then the exact-version directory for
/// templates the family does not provide (`2/` then `2/2.00/` for version
/// `2.00`).
pub struct Builder<R: TemplateRenderer> {
    renderer: R,
    templates_root: PathBuf,
    version: String,
}

impl<R: TemplateRenderer> Builder<R> {
    pub fn new(renderer: R, templates_root: impl Into<PathBuf>) -> Self {
        Builder {
            renderer,
            templates_root: templates_root.into(),
            version: GENERATOR_VERSION.to_string(),
        }
    }

    /// Override the generator version, e.g. to pin an older template set.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Generate artifacts for every table of the schema, in schema order.
    ///
    /// The base artifact (`Base<Namespace>`) is rewritten unconditionally;
    /// the user artifact (`<Namespace>`) is written only if absent, so hand
    /// edits survive regeneration.
    pub fn build(
        &self,
        schema: &Schema,
        output_dir: &Path,
    ) -> Result<BuildSummary, GenerationError> {
        self.check_writable(output_dir)?;
        if !schema.is_resolved() {
            tracing::warn!(
                "Generating from an unresolved schema; reverse foreign keys will be missing"
            );
        }

        let search_paths = self.template_search_paths();
        let mut summary = BuildSummary::default();
        for (table_name, table) in &schema.tables {
            let vars = self.template_vars(schema, table_name, table);

            let base_path = output_dir.join(format!("Base{}", table.namespace));
            let rendered = self.renderer.render(BASE_TEMPLATE, &search_paths, &vars)?;
            write_artifact(&base_path, &rendered)?;
            summary.written.push(base_path);

            let user_path = output_dir.join(&table.namespace);
            if user_path.exists() {
                tracing::debug!("Keeping existing user artifact {}", user_path.display());
                summary.skipped.push(user_path);
            } else {
                let rendered = self.renderer.render(USER_TEMPLATE, &search_paths, &vars)?;
                write_artifact(&user_path, &rendered)?;
                summary.written.push(user_path);
            }
        }

        tracing::info!(
            "Generated {} artifacts into {} ({} user artifacts kept)",
            summary.written.len(),
            output_dir.display(),
            summary.skipped.len()
        );
        Ok(summary)
    }

    /// Template directories in precedence order: the major-version family
    /// first, the exact-version refinements second.
    fn template_search_paths(&self) -> Vec<PathBuf> {
        let major = self.version.split('.').next().unwrap_or(&self.version);
        vec![
            self.templates_root.join(major),
            self.templates_root.join(major).join(&self.version),
        ]
    }

    fn template_vars(
        &self,
        schema: &Schema,
        table_name: &str,
        table: &Table,
    ) -> HashMap<String, Value> {
        let table_value = serde_json::to_value(table).expect("Failed to serialize table model");
        HashMap::from([
            ("database".to_string(), json!(schema.database)),
            ("version".to_string(), json!(self.version)),
            ("table_name".to_string(), json!(table_name)),
            ("namespace".to_string(), json!(table.namespace)),
            ("table".to_string(), table_value),
        ])
    }

    fn check_writable(&self, output_dir: &Path) -> Result<(), GenerationError> {
        let not_writable = || GenerationError::TargetNotWritable(output_dir.to_path_buf());
        let metadata = fs::metadata(output_dir).map_err(|_| not_writable())?;
        if !metadata.is_dir() || metadata.permissions().readonly() {
            return Err(not_writable());
        }
        Ok(())
    }
}

fn write_artifact(path: &Path, content: &str) -> Result<(), GenerationError> {
    fs::write(path, content).map_err(|e| GenerationError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
