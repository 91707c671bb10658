//! The schema-source capability: three logical queries against a live
//! database, expressed as a trait so the pipeline never touches a driver
//! type directly.
//!
//! Concrete implementations: [`crate::mysql::MysqlSource`] (behind the
//! `mysql` feature) for live servers, and [`MemorySource`] for fixtures.

use std::collections::HashMap;
use std::fmt;

/// One row of the column-metadata query, dialect-neutral.
///
/// `column_type` is the full vendor text (e.g. `int(10) unsigned`); parsing
/// it into a classified column happens downstream.
#[derive(Debug, Clone)]
pub struct ColumnRecord {
    pub name: String,
    pub column_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    /// Extra attributes text, e.g. `auto_increment`.
    pub extra: String,
    /// Key role marker: `PRI`, `UNI`, `MUL` or empty.
    pub key: String,
    pub comment: String,
}

impl ColumnRecord {
    /// Convenience constructor for the common non-null, no-extras case.
    pub fn simple(name: &str, column_type: &str) -> Self {
        ColumnRecord {
            name: name.to_string(),
            column_type: column_type.to_string(),
            nullable: false,
            default: None,
            extra: String::new(),
            key: String::new(),
            comment: String::new(),
        }
    }
}

/// Error raised by a schema source. Any variant aborts the whole
/// introspection run; there is no partial model.
#[derive(Debug, Clone)]
pub enum SchemaAccessError {
    Connection {
        message: String,
    },
    TableList {
        database: String,
        message: String,
    },
    CreateTable {
        table: String,
        message: String,
    },
    Columns {
        table: String,
        message: String,
    },
}

impl fmt::Display for SchemaAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaAccessError::Connection { message } => {
                write!(f, "Failed to connect to database: {}", message)
            }
            SchemaAccessError::TableList { database, message } => {
                write!(f, "Failed to list tables of '{}': {}", database, message)
            }
            SchemaAccessError::CreateTable { table, message } => {
                write!(f, "Failed to fetch DDL for table '{}': {}", table, message)
            }
            SchemaAccessError::Columns { table, message } => {
                write!(f, "Failed to fetch columns of table '{}': {}", table, message)
            }
        }
    }
}

impl std::error::Error for SchemaAccessError {}

/// Capability to run the three logical schema queries.
///
/// Methods take `&mut self`: the run is single-threaded and a live
/// connection handle needs exclusive access.
pub trait SchemaSource {
    /// Names of the tables to introspect, in the order the model should
    /// keep them.
    fn table_names(&mut self) -> Result<Vec<String>, SchemaAccessError>;

    /// Verbatim DDL text of one table, as `SHOW CREATE TABLE` reports it.
    fn create_table(&mut self, table: &str) -> Result<String, SchemaAccessError>;

    /// Column metadata rows of one table, in definition order.
    fn columns(&mut self, table: &str) -> Result<Vec<ColumnRecord>, SchemaAccessError>;
}

/// In-memory schema source backed by hand-built fixtures.
///
/// Useful for tests and for regenerating artifacts from a recorded schema
/// without a live server. Tables are reported in insertion order.
#[derive(Debug, Default)]
pub struct MemorySource {
    order: Vec<String>,
    ddl: HashMap<String, String>,
    columns: HashMap<String, Vec<ColumnRecord>>,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource::default()
    }

    /// Add a table fixture. Builder-style so fixtures read as one chain.
    pub fn table(mut self, name: &str, ddl: &str, columns: Vec<ColumnRecord>) -> Self {
        self.order.push(name.to_string());
        self.ddl.insert(name.to_string(), ddl.to_string());
        self.columns.insert(name.to_string(), columns);
        self
    }
}

impl SchemaSource for MemorySource {
    fn table_names(&mut self) -> Result<Vec<String>, SchemaAccessError> {
        Ok(self.order.clone())
    }

    fn create_table(&mut self, table: &str) -> Result<String, SchemaAccessError> {
        self.ddl
            .get(table)
            .cloned()
            .ok_or_else(|| SchemaAccessError::CreateTable {
                table: table.to_string(),
                message: "no such fixture table".to_string(),
            })
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnRecord>, SchemaAccessError> {
        self.columns
            .get(table)
            .cloned()
            .ok_or_else(|| SchemaAccessError::Columns {
                table: table.to_string(),
                message: "no such fixture table".to_string(),
            })
    }
}
