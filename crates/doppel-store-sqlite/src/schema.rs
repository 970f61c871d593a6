//! SQL schema for the doppel SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The corpus of submitted artifacts.
-- Rows are insert-only: no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS artifacts (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id    TEXT NOT NULL,
    assignment_id TEXT NOT NULL,
    file_path     TEXT NOT NULL,
    uploaded_at   TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    status        TEXT NOT NULL DEFAULT 'pending'
);

-- One row per analysis run. artifact_id is deliberately not unique:
-- re-triggering analysis appends a fresh report.
CREATE TABLE IF NOT EXISTS reports (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    artifact_id         INTEGER NOT NULL REFERENCES artifacts(id),
    score               REAL NOT NULL,
    verdict             INTEGER NOT NULL,
    matched_artifact_id INTEGER,   -- NULL when nothing matched
    state               TEXT NOT NULL,   -- 'completed' | 'skipped' | 'error'
    detail              TEXT NOT NULL,
    created_at          TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS artifacts_student_idx ON artifacts(student_id);
CREATE INDEX IF NOT EXISTS reports_artifact_idx  ON reports(artifact_id);

PRAGMA user_version = 1;
";
