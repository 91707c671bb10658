//! In-memory relational schema model.
//!
//! This module defines the structures the introspector assembles from a live
//! database and the generator consumes: a [`Schema`] of [`Table`]s, each with
//! classified [`Column`]s, primary/unique keys and [`ForeignKey`] entries.
//! Everything serializes with serde so the whole model can be handed to a
//! template context or dumped as JSON.

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use serde::Serialize;

/// Coarse type family a column maps to in generated code.
///
/// Classification is a pure function of the vendor type keyword: the integer
/// and float families are fixed allow-lists, and anything else (dates, text,
/// binary, enums, unknown vendor types) is treated as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Integer,
    Float,
    String,
}

/// One column of an introspected table.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    /// Type family the raw vendor type classifies into.
    pub kind: TypeKind,
    /// Bare vendor type keyword with any parenthesized argument stripped,
    /// e.g. `int` for `int(10) unsigned`.
    pub raw_type: String,
    /// Raw parenthesized type argument, e.g. `10,2` for `decimal(10,2)`.
    pub type_arg: Option<String>,
    pub unsigned: bool,
    pub nullable: bool,
    /// Default value exactly as the server reports it, unparsed.
    pub default: Option<String>,
    pub auto_increment: bool,
    pub comment: String,
    pub primary_key: bool,
}

/// A local-column/referenced-column pair within a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub local: String,
    pub referenced: String,
}

/// A foreign key edge, either declared in DDL or synthesized as the reverse
/// of a declared one during relationship resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ForeignKey {
    /// Constraint name from the DDL; empty for reverse entries.
    pub constraint_name: String,
    pub referenced_table: String,
    /// Ordered column pairs. The DDL parser emits exactly one pair per
    /// declared clause; the model supports more for synthetic entries.
    pub columns: Vec<ColumnRef>,
    /// True iff this entry was synthesized by relationship resolution.
    pub reverse: bool,
    /// Display name of the referenced table, stamped during resolution on
    /// declared and reverse entries alike.
    pub referenced_namespace: String,
}

impl ForeignKey {
    /// Local column names of this key, in pair order.
    pub fn local_columns(&self) -> Vec<String> {
        self.columns.iter().map(|pair| pair.local.clone()).collect()
    }
}

/// A unique key with its columns in textual DDL order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueKey {
    pub name: String,
    pub columns: Vec<String>,
}

/// One introspected table with its relationship metadata.
///
/// `related_namespaces`, `reference_columns` and `native_foreign_keys` are
/// derived fields left empty by the introspector and populated by
/// [`crate::relations::resolve`].
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub name: String,
    /// PascalCase display name derived from the table name, used to build
    /// artifact names and type names in templates.
    pub namespace: String,
    /// Verbatim DDL text as reported by the server.
    pub ddl: String,
    /// Columns in column-metadata order.
    pub columns: IndexMap<String, Column>,
    /// Primary key column names in column-metadata order. Possibly empty,
    /// possibly composite.
    pub primary_key: Vec<String>,
    /// Declared keys first, reverse entries appended by resolution.
    pub foreign_keys: Vec<ForeignKey>,
    pub unique_keys: Vec<UniqueKey>,
    /// Display names of tables this one references via declared keys,
    /// deduplicated in first-occurrence order. Templates use this for
    /// imports.
    pub related_namespaces: Vec<String>,
    /// Local column names of the most recently seen declared foreign key.
    /// Later keys overwrite earlier ones; empty when the table declares
    /// none.
    pub reference_columns: Vec<String>,
    /// Local column-name lists of the declared foreign keys, captured
    /// independently of the reverse entries resolution appends.
    pub native_foreign_keys: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table shell for `name` around its DDL text. Columns
    /// and keys are filled in by the introspector.
    pub fn new(name: impl Into<String>, ddl: impl Into<String>) -> Self {
        let name = name.into();
        let namespace = display_name(&name);
        Table {
            name,
            namespace,
            ddl: ddl.into(),
            columns: IndexMap::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            unique_keys: Vec::new(),
            related_namespaces: Vec::new(),
            reference_columns: Vec::new(),
            native_foreign_keys: Vec::new(),
        }
    }

    /// Declared (non-reverse) foreign keys, in DDL order.
    pub fn declared_foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys.iter().filter(|fk| !fk.reverse)
    }

    /// Reverse foreign keys synthesized by resolution.
    pub fn reverse_foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys.iter().filter(|fk| fk.reverse)
    }
}

/// The full introspected schema of one database.
///
/// Table iteration order is the table-listing query order; callers rely on
/// it for deterministic output.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub database: String,
    pub tables: IndexMap<String, Table>,
    #[serde(skip)]
    resolved: bool,
}

impl Schema {
    pub fn new(database: impl Into<String>) -> Self {
        Schema {
            database: database.into(),
            tables: IndexMap::new(),
            resolved: false,
        }
    }

    /// Whether relationship resolution has already run on this schema.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.resolved = true;
    }
}

/// PascalCase display name for a table name: `order_items` -> `OrderItems`.
pub fn display_name(table_name: &str) -> String {
    table_name.to_case(Case::Pascal)
}
