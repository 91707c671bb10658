//! Relationship resolution over an introspected schema.
//!
//! [`resolve`] makes foreign-key awareness bidirectional: for every declared
//! key it appends a reverse entry to the referenced table, then fills in the
//! derived per-table fields templates consume (`related_namespaces`,
//! `reference_columns`, `native_foreign_keys`) and stamps
//! `referenced_namespace` on every key.
//!
//! Resolution runs in two phases. Reverse entries are first collected into a
//! side list keyed by target table and only then appended, so the table map
//! is never mutated while it is being walked. Declared keys whose target is
//! not part of the schema (cross-database references are legal DDL) are
//! skipped silently and gain no reverse entry.

use crate::schema::{ColumnRef, ForeignKey, Schema, display_name};

/// Resolve relationships in place. Calling this on an already-resolved
/// schema is a no-op, so layered callers cannot double up reverse entries.
pub fn resolve(schema: &mut Schema) {
    if schema.is_resolved() {
        return;
    }

    cross_reference(schema);
    collect_derived_fields(schema);
    schema.mark_resolved();

    tracing::debug!("Resolved relationships for {} tables", schema.tables.len());
}

/// Phase one: append a reverse entry to the target of every declared key.
fn cross_reference(schema: &mut Schema) {
    let mut reversed: Vec<(String, ForeignKey)> = Vec::new();
    for (table_name, table) in &schema.tables {
        for fk in table.declared_foreign_keys() {
            if !schema.tables.contains_key(&fk.referenced_table) {
                tracing::debug!(
                    "Skipping foreign key '{}' on '{}': referenced table '{}' is outside the schema",
                    fk.constraint_name,
                    table_name,
                    fk.referenced_table
                );
                continue;
            }
            reversed.push((fk.referenced_table.clone(), reverse_of(fk, table_name)));
        }
    }

    for (target, fk) in reversed {
        if let Some(table) = schema.tables.get_mut(&target) {
            table.foreign_keys.push(fk);
        }
    }
}

/// Phase two: namespaces on every key, plus the declared-key aggregates.
fn collect_derived_fields(schema: &mut Schema) {
    for table in schema.tables.values_mut() {
        for fk in &mut table.foreign_keys {
            fk.referenced_namespace = display_name(&fk.referenced_table);
        }

        let mut related: Vec<String> = Vec::new();
        let mut reference_columns: Vec<String> = Vec::new();
        let mut native: Vec<Vec<String>> = Vec::new();
        for fk in table.declared_foreign_keys() {
            if !related.contains(&fk.referenced_namespace) {
                related.push(fk.referenced_namespace.clone());
            }
            // Later declared keys overwrite earlier ones here. Generations
            // of templates were built against that behavior, so it stays.
            reference_columns = dedup_preserving_order(fk.local_columns());
            native.push(fk.local_columns());
        }
        table.related_namespaces = related;
        table.reference_columns = reference_columns;
        table.native_foreign_keys = native;
    }
}

/// The reverse counterpart of a declared key: lives on the referenced
/// table, points back at the declaring one, with the column pairs swapped.
fn reverse_of(fk: &ForeignKey, declaring_table: &str) -> ForeignKey {
    ForeignKey {
        constraint_name: String::new(),
        referenced_table: declaring_table.to_string(),
        columns: fk
            .columns
            .iter()
            .map(|pair| ColumnRef {
                local: pair.referenced.clone(),
                referenced: pair.local.clone(),
            })
            .collect(),
        reverse: true,
        referenced_namespace: String::new(),
    }
}

fn dedup_preserving_order(columns: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for column in columns {
        if !seen.contains(&column) {
            seen.push(column);
        }
    }
    seen
}
