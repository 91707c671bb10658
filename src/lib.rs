//! # Tablesmith: MySQL Schema Reverse-Engineering and Model Generation
//!
//! Tablesmith introspects a live relational database schema, builds an
//! in-memory model with bidirectional foreign-key awareness, and emits two
//! source artifacts per table through a template engine: a regenerated base
//! model and a write-once user model.
//!
//! ## Features
//!
//! - **Schema introspection**: tables, columns, classified types, primary,
//!   unique and foreign keys, read through the three logical schema queries
//! - **Relationship resolution**: declared foreign keys are cross-referenced
//!   into reverse entries on the referenced tables
//! - **Template-driven generation**: base artifacts are rewritten on every
//!   run, user artifacts are written once and never touched again
//! - **Pluggable collaborators**: the database side is a [`SchemaSource`]
//!   trait, the rendering side a [`TemplateRenderer`] trait; a Diesel-backed
//!   MySQL source ships behind the `mysql` feature
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tablesmith::{Builder, ColumnRecord, Introspector, MemorySource, TeraRenderer, relations};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = MemorySource::new().table(
//!         "users",
//!         "CREATE TABLE `users` (`id` int NOT NULL, PRIMARY KEY (`id`))",
//!         vec![ColumnRecord::simple("id", "int")],
//!     );
//!
//!     let mut schema = Introspector::new(source, "shop").introspect()?;
//!     relations::resolve(&mut schema);
//!
//!     Builder::new(TeraRenderer::new(), "templates").build(&schema, Path::new("generated"))?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod schema;
pub mod introspect;
pub mod relations;

// Artifact generation
pub mod codegen;

// Diesel-backed schema source (feature-gated)
#[cfg(feature = "mysql")]
pub mod mysql;

// Re-export key types
pub use schema::{Column, ColumnRef, ForeignKey, Schema, Table, TypeKind, UniqueKey, display_name};
pub use introspect::{ColumnRecord, Introspector, MemorySource, SchemaAccessError, SchemaSource};

// Re-export codegen types
pub use codegen::{
    BASE_TEMPLATE, BuildSummary, Builder, GENERATOR_VERSION, GenerationError, USER_TEMPLATE,
};
pub use codegen::renderer::{RenderError, TemplateRenderer, TeraRenderer};

#[cfg(feature = "mysql")]
pub use mysql::MysqlSource;
