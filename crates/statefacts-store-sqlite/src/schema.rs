//! SQL schema for the statefacts SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per state code. An empty array is a live document, distinct from
-- a missing row.
CREATE TABLE IF NOT EXISTS funfact_documents (
    state_code TEXT PRIMARY KEY,   -- uppercase postal code
    funfacts   TEXT NOT NULL DEFAULT '[]'   -- JSON array of strings, in order
);

PRAGMA user_version = 1;
";
