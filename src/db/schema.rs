//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `quotes` table (one quote per row, id assigned by the store)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Quotes
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY NOT NULL,
    text TEXT NOT NULL,
    author TEXT NOT NULL
);
"#;
