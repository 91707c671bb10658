//! Constraint extraction from `SHOW CREATE TABLE` text.
//!
//! The DDL is scanned with case-insensitive, whitespace-tolerant regexes
//! rather than a grammar: the input is server-emitted and regular enough
//! that clause-level matching is reliable. A DDL with no matching clause
//! yields empty vectors, never an error.
//!
//! Known limitation: a composite `FOREIGN KEY (a, b)` clause is captured as
//! a single mangled column pair, because the lazy captures stop at the
//! first closing backtick-paren. Single-column clauses, the overwhelmingly
//! common case in server output, parse exactly.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::schema::{ColumnRef, ForeignKey, UniqueKey};

static FOREIGN_KEY_PATTERN: OnceLock<Regex> = OnceLock::new();
static UNIQUE_KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn foreign_key_pattern() -> &'static Regex {
    FOREIGN_KEY_PATTERN.get_or_init(|| {
        RegexBuilder::new(
            r"CONSTRAINT\s*`(.*?)`\s*FOREIGN\s*KEY\s*\(`(.*?)`\)\s*REFERENCES\s*`(.*?)`\s*\(`(.*?)`\)",
        )
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("Failed to compile foreign key pattern")
    })
}

fn unique_key_pattern() -> &'static Regex {
    UNIQUE_KEY_PATTERN.get_or_init(|| {
        RegexBuilder::new(r"UNIQUE\s*KEY\s*`(.*?)`\s*\((.*?)\)")
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .expect("Failed to compile unique key pattern")
    })
}

/// Extract the declared foreign keys from DDL text, in textual order.
///
/// Entries come back with `reverse: false` and an empty
/// `referenced_namespace`; resolution fills the namespace in later.
pub fn parse_foreign_keys(ddl: &str) -> Vec<ForeignKey> {
    foreign_key_pattern()
        .captures_iter(ddl)
        .map(|captures| ForeignKey {
            constraint_name: captures[1].to_string(),
            referenced_table: captures[3].to_string(),
            columns: vec![ColumnRef {
                local: captures[2].to_string(),
                referenced: captures[4].to_string(),
            }],
            reverse: false,
            referenced_namespace: String::new(),
        })
        .collect()
}

/// Extract the unique keys from DDL text, in textual order. Column lists
/// are split on commas with whitespace and backticks trimmed.
pub fn parse_unique_keys(ddl: &str) -> Vec<UniqueKey> {
    unique_key_pattern()
        .captures_iter(ddl)
        .map(|captures| UniqueKey {
            name: captures[1].to_string(),
            columns: captures[2]
                .split(',')
                .map(|column| column.trim().trim_matches('`').to_string())
                .collect(),
        })
        .collect()
}
