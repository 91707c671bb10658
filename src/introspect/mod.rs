//! Live-schema introspection.
//!
//! [`Introspector`] drives the three logical queries of a [`SchemaSource`]
//! (list tables, fetch per-table DDL, fetch per-table column metadata) and
//! assembles a [`Schema`] in query order. Any query failure aborts the run;
//! there is no partial model.

pub mod column;
pub mod ddl;
pub mod source;

use crate::schema::{Schema, Table};

pub use column::{classify_type, parse_column};
pub use ddl::{parse_foreign_keys, parse_unique_keys};
pub use source::{ColumnRecord, MemorySource, SchemaAccessError, SchemaSource};

/// Builds the in-memory schema model from a schema source.
///
/// The introspector never mutates the database and never resolves
/// relationships; run [`crate::relations::resolve`] on the result for
/// reverse foreign keys and the derived per-table fields.
pub struct Introspector<S: SchemaSource> {
    source: S,
    database: String,
}

impl<S: SchemaSource> Introspector<S> {
    pub fn new(source: S, database: impl Into<String>) -> Self {
        Introspector {
            source,
            database: database.into(),
        }
    }

    /// Run the full introspection pass and assemble the schema.
    ///
    /// Tables appear in listing order; columns in metadata order. The
    /// primary key is collected from columns whose key role is `PRI`, so
    /// composite keys come out in column order.
    pub fn introspect(&mut self) -> Result<Schema, SchemaAccessError> {
        let names = self.source.table_names()?;
        tracing::info!("Introspecting {} tables of '{}'", names.len(), self.database);

        let mut schema = Schema::new(&self.database);
        for name in names {
            schema.tables.insert(name.clone(), self.introspect_table(&name)?);
        }
        Ok(schema)
    }

    fn introspect_table(&mut self, name: &str) -> Result<Table, SchemaAccessError> {
        let ddl = self.source.create_table(name)?;
        let records = self.source.columns(name)?;

        let mut table = Table::new(name, ddl);
        for record in &records {
            let column = column::parse_column(record);
            if column.primary_key {
                table.primary_key.push(column.name.clone());
            }
            table.columns.insert(column.name.clone(), column);
        }
        table.foreign_keys = ddl::parse_foreign_keys(&table.ddl);
        table.unique_keys = ddl::parse_unique_keys(&table.ddl);

        tracing::debug!(
            "Introspected table '{}': {} columns, {} foreign keys, {} unique keys",
            name,
            table.columns.len(),
            table.foreign_keys.len(),
            table.unique_keys.len()
        );
        Ok(table)
    }

    /// Give the source back, e.g. to reuse the underlying connection.
    pub fn into_source(self) -> S {
        self.source
    }
}
