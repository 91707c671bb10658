//! MySQL-backed schema source built on Diesel.
//!
//! The pipeline is a single-threaded batch over a read-only connection, so
//! [`MysqlSource`] holds one [`MysqlConnection`] rather than a pool. All
//! three logical queries go through `sql_query` with name-addressed row
//! mapping; `SHOW CREATE TABLE` needs a hand-written [`QueryableByName`]
//! because its result column is literally named `Create Table`.

use diesel::deserialize::{self, QueryableByName};
use diesel::mysql::{Mysql, MysqlConnection};
use diesel::prelude::*;
use diesel::row::NamedRow;
use diesel::sql_query;
use diesel::sql_types::{Nullable, Text};

use crate::introspect::source::{ColumnRecord, SchemaAccessError, SchemaSource};

/// Base tables of the connected database, in name order. The alias keeps
/// the result column name stable across server versions.
const TABLE_LIST_SQL: &str = "SELECT table_name AS table_name \
     FROM information_schema.tables \
     WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

struct TableNameRow {
    name: String,
}

impl QueryableByName<Mysql> for TableNameRow {
    fn build<'a>(row: &impl NamedRow<'a, Mysql>) -> deserialize::Result<Self> {
        Ok(TableNameRow {
            name: NamedRow::get::<Text, String>(row, "table_name")?,
        })
    }
}

struct DatabaseNameRow {
    name: Option<String>,
}

impl QueryableByName<Mysql> for DatabaseNameRow {
    fn build<'a>(row: &impl NamedRow<'a, Mysql>) -> deserialize::Result<Self> {
        Ok(DatabaseNameRow {
            name: NamedRow::get::<Nullable<Text>, Option<String>>(row, "database_name")?,
        })
    }
}

struct ShowCreateTableRow {
    create_table: String,
}

impl QueryableByName<Mysql> for ShowCreateTableRow {
    fn build<'a>(row: &impl NamedRow<'a, Mysql>) -> deserialize::Result<Self> {
        Ok(ShowCreateTableRow {
            create_table: NamedRow::get::<Text, String>(row, "Create Table")?,
        })
    }
}

struct ShowColumnRow {
    field: String,
    column_type: String,
    null: String,
    key: String,
    default: Option<String>,
    extra: String,
    comment: String,
}

impl QueryableByName<Mysql> for ShowColumnRow {
    fn build<'a>(row: &impl NamedRow<'a, Mysql>) -> deserialize::Result<Self> {
        Ok(ShowColumnRow {
            field: NamedRow::get::<Text, String>(row, "Field")?,
            column_type: NamedRow::get::<Text, String>(row, "Type")?,
            null: NamedRow::get::<Text, String>(row, "Null")?,
            key: NamedRow::get::<Text, String>(row, "Key")?,
            default: NamedRow::get::<Nullable<Text>, Option<String>>(row, "Default")?,
            extra: NamedRow::get::<Text, String>(row, "Extra")?,
            comment: NamedRow::get::<Text, String>(row, "Comment")?,
        })
    }
}

impl From<ShowColumnRow> for ColumnRecord {
    fn from(row: ShowColumnRow) -> Self {
        ColumnRecord {
            name: row.field,
            column_type: row.column_type,
            nullable: row.null == "YES",
            default: row.default,
            extra: row.extra,
            key: row.key,
            comment: row.comment,
        }
    }
}

/// [`SchemaSource`] over a live MySQL server.
pub struct MysqlSource {
    conn: MysqlConnection,
    database: String,
}

impl MysqlSource {
    /// Connect and verify a database is selected in the URL.
    pub fn connect(database_url: &str) -> Result<Self, SchemaAccessError> {
        let mut conn =
            MysqlConnection::establish(database_url).map_err(|e| SchemaAccessError::Connection {
                message: e.to_string(),
            })?;
        let database = current_database(&mut conn)?;
        tracing::info!("Connected to MySQL database '{}'", database);
        Ok(MysqlSource { conn, database })
    }

    /// Name of the connected database, as the server reports it.
    pub fn database(&self) -> &str {
        &self.database
    }
}

impl SchemaSource for MysqlSource {
    fn table_names(&mut self) -> Result<Vec<String>, SchemaAccessError> {
        sql_query(TABLE_LIST_SQL)
            .load::<TableNameRow>(&mut self.conn)
            .map(|rows| rows.into_iter().map(|row| row.name).collect())
            .map_err(|e| SchemaAccessError::TableList {
                database: self.database.clone(),
                message: e.to_string(),
            })
    }

    fn create_table(&mut self, table: &str) -> Result<String, SchemaAccessError> {
        sql_query(format!("SHOW CREATE TABLE {}", quote_identifier(table)))
            .get_result::<ShowCreateTableRow>(&mut self.conn)
            .map(|row| row.create_table)
            .map_err(|e| SchemaAccessError::CreateTable {
                table: table.to_string(),
                message: e.to_string(),
            })
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnRecord>, SchemaAccessError> {
        sql_query(format!("SHOW FULL COLUMNS FROM {}", quote_identifier(table)))
            .load::<ShowColumnRow>(&mut self.conn)
            .map(|rows| rows.into_iter().map(ColumnRecord::from).collect())
            .map_err(|e| SchemaAccessError::Columns {
                table: table.to_string(),
                message: e.to_string(),
            })
    }
}

fn current_database(conn: &mut MysqlConnection) -> Result<String, SchemaAccessError> {
    let row = sql_query("SELECT DATABASE() AS database_name")
        .get_result::<DatabaseNameRow>(conn)
        .map_err(|e| SchemaAccessError::Connection {
            message: e.to_string(),
        })?;
    row.name.ok_or_else(|| SchemaAccessError::Connection {
        message: "no database selected; include the database name in the URL".to_string(),
    })
}

/// Backtick-quote an identifier, doubling any interior backticks.
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
