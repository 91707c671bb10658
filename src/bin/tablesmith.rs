//! tablesmith CLI - reverse-engineer a MySQL schema into generated models
//!
//! Connects to a live database, introspects its tables and relationships,
//! and renders per-table artifacts from a template set.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use tablesmith::{Builder, Introspector, MysqlSource, Schema, TeraRenderer, relations};

#[derive(Parser)]
#[command(name = "tablesmith")]
#[command(version, about = "Reverse-engineer a MySQL schema into generated models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate per-table artifacts from a live database schema
    Generate {
        /// MySQL connection URL (defaults to DATABASE_URL from the environment)
        #[arg(short = 'u', long)]
        database_url: Option<String>,

        /// Database label in generated output (defaults to the connected schema name)
        #[arg(short, long)]
        database: Option<String>,

        /// Output directory for generated artifacts
        #[arg(short, long, default_value = "generated")]
        output: PathBuf,

        /// Root directory of the template sets
        #[arg(short, long, default_value = "templates")]
        templates: PathBuf,

        /// Use a specific template version instead of the built-in one
        #[arg(long)]
        template_version: Option<String>,
    },

    /// Introspect a live database schema and print the model
    Inspect {
        /// MySQL connection URL (defaults to DATABASE_URL from the environment)
        #[arg(short = 'u', long)]
        database_url: Option<String>,

        /// Database label in the model (defaults to the connected schema name)
        #[arg(short, long)]
        database: Option<String>,

        /// Print the full model as pretty JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            database_url,
            database,
            output,
            templates,
            template_version,
        } => generate(database_url, database, output, templates, template_version),
        Commands::Inspect {
            database_url,
            database,
            json,
        } => inspect(database_url, database, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Resolve the connection URL with precedence: CLI flag > DATABASE_URL
fn resolve_database_url(flag: Option<String>) -> Result<String, String> {
    if let Some(url) = flag {
        return Ok(url);
    }
    std::env::var("DATABASE_URL")
        .map_err(|_| "No connection URL given: pass --database-url or set DATABASE_URL".to_string())
}

/// Connect, introspect and resolve relationships.
fn introspect_live(
    database_url: Option<String>,
    database: Option<String>,
) -> Result<Schema, String> {
    let url = resolve_database_url(database_url)?;
    let source = MysqlSource::connect(&url).map_err(|e| e.to_string())?;
    let database = database.unwrap_or_else(|| source.database().to_string());
    println!("  ✓ Connected to '{}'", database);

    let mut introspector = Introspector::new(source, database);
    let mut schema = introspector.introspect().map_err(|e| e.to_string())?;
    println!("  ✓ Introspected {} tables", schema.tables.len());

    relations::resolve(&mut schema);
    println!("  ✓ Resolved relationships");

    Ok(schema)
}

/// Generate per-table artifacts from a live database schema
fn generate(
    database_url: Option<String>,
    database: Option<String>,
    output: PathBuf,
    templates: PathBuf,
    template_version: Option<String>,
) -> Result<(), String> {
    println!("🔧 Generating models from live schema...");

    let schema = introspect_live(database_url, database)?;

    let mut builder = Builder::new(TeraRenderer::new(), templates);
    if let Some(version) = template_version {
        builder = builder.with_version(version);
    }

    let summary = builder.build(&schema, &output).map_err(|e| e.to_string())?;
    for path in &summary.written {
        println!("  ✓ Wrote {}", path.display());
    }
    for path in &summary.skipped {
        println!("  ℹ Kept existing {}", path.display());
    }

    println!(
        "✨ Generation complete: {} artifacts written, {} kept",
        summary.written.len(),
        summary.skipped.len()
    );

    Ok(())
}

/// Introspect a live database schema and print the model
fn inspect(
    database_url: Option<String>,
    database: Option<String>,
    json: bool,
) -> Result<(), String> {
    println!("🔍 Inspecting live schema...");

    let schema = introspect_live(database_url, database)?;

    if json {
        let rendered = serde_json::to_string_pretty(&schema)
            .map_err(|e| format!("Failed to serialize schema: {}", e))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("\nDatabase: {}", schema.database);
    for (name, table) in &schema.tables {
        println!("\n  {} (namespace: {})", name, table.namespace);
        for column in table.columns.values() {
            let mut line = format!("    - {}: {}", column.name, column.raw_type);
            if let Some(arg) = &column.type_arg {
                line.push_str(&format!("({})", arg));
            }
            if column.unsigned {
                line.push_str(" unsigned");
            }
            if column.nullable {
                line.push_str(" null");
            }
            if column.primary_key {
                line.push_str(" [pk]");
            }
            if column.auto_increment {
                line.push_str(" [auto]");
            }
            println!("{}", line);
        }
        if !table.primary_key.is_empty() {
            println!("    primary key: {}", table.primary_key.join(", "));
        }
        for unique in &table.unique_keys {
            println!("    unique {}: {}", unique.name, unique.columns.join(", "));
        }
        for fk in table.declared_foreign_keys() {
            println!(
                "    references {} via {}",
                fk.referenced_table,
                fk.local_columns().join(", ")
            );
        }
        for fk in table.reverse_foreign_keys() {
            println!("    referenced by {}", fk.referenced_table);
        }
    }

    Ok(())
}
