//! Column-metadata parsing: vendor type classification and the mapping from
//! a raw [`ColumnRecord`] to a model [`Column`].
//!
//! Parsing is total. Malformed type text degrades to the string family with
//! no type argument; it never produces an error.

use std::sync::OnceLock;

use regex::Regex;

use crate::introspect::source::ColumnRecord;
use crate::schema::{Column, TypeKind};

/// Vendor keywords of the integer family.
const INTEGER_TYPES: [&str; 5] = ["tinyint", "smallint", "mediumint", "int", "bigint"];

/// Vendor keywords of the float family.
const FLOAT_TYPES: [&str; 3] = ["float", "double", "decimal"];

static TYPE_ARG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn type_arg_pattern() -> &'static Regex {
    TYPE_ARG_PATTERN
        .get_or_init(|| Regex::new(r"\((.*?)\)").expect("Failed to compile type argument pattern"))
}

/// Classify a vendor column type into its [`TypeKind`] family.
///
/// Accepts the full type text (`int(10) unsigned`, `DECIMAL(10,2)`, `text`):
/// the keyword is whatever precedes the first `(` or space, matched
/// case-insensitively, so an `unsigned` marker never changes the family.
pub fn classify_type(column_type: &str) -> TypeKind {
    let lowered = column_type.trim().to_ascii_lowercase();
    let keyword = match lowered.find(['(', ' ']) {
        Some(end) => &lowered[..end],
        None => lowered.as_str(),
    };
    if INTEGER_TYPES.contains(&keyword) {
        TypeKind::Integer
    } else if FLOAT_TYPES.contains(&keyword) {
        TypeKind::Float
    } else {
        TypeKind::String
    }
}

/// Parse one column-metadata row into a model column.
pub fn parse_column(record: &ColumnRecord) -> Column {
    let type_arg = type_arg_pattern()
        .captures(&record.column_type)
        .map(|captures| captures[1].to_string());

    let trimmed = record.column_type.trim();
    let raw_type = match trimmed.find(['(', ' ']) {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };

    Column {
        name: record.name.clone(),
        kind: classify_type(&record.column_type),
        raw_type: raw_type.to_string(),
        type_arg,
        unsigned: record.column_type.to_ascii_lowercase().contains("unsigned"),
        nullable: record.nullable,
        default: record.default.clone(),
        auto_increment: record.extra.contains("auto_increment"),
        comment: record.comment.clone(),
        primary_key: record.key == "PRI",
    }
}
