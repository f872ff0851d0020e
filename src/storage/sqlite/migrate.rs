//! Schema management for the SQLite backend.
//!
//! Every migration is identified by a version string; applied versions are
//! recorded in the internal `log` table as `migration_applied` rows, so
//! re-running is a no-op.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result, params};

type Migration = (&'static str, &'static str, fn(&Connection) -> Result<()>);

const MIGRATIONS: [Migration; 2] = [
    (
        "20250601_0001_create_core_tables",
        "Created families, reminders, completion_events and counters tables",
        create_core_tables,
    ),
    (
        "20250702_0002_completion_event_index",
        "Indexed completion_events by reminder_id",
        index_completion_events,
    ),
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn create_core_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS families (
            id      TEXT PRIMARY KEY,
            name    TEXT NOT NULL,
            members TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS reminders (
            id                  TEXT PRIMARY KEY,
            title               TEXT NOT NULL,
            description         TEXT NOT NULL DEFAULT '',
            due_date            TEXT,
            recurrence_type     TEXT NOT NULL DEFAULT 'once'
                                CHECK(recurrence_type IN ('once','daily','weekly','monthly')),
            recurrence_days     TEXT NOT NULL DEFAULT '[]',
            recurrence_date     INTEGER,
            recurrence_end_date TEXT NOT NULL DEFAULT '2099-12-31T23:59:59Z',
            completed           INTEGER NOT NULL DEFAULT 0,
            completed_at        TEXT,
            family_id           TEXT NOT NULL,
            family_member       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS completion_events (
            id           TEXT PRIMARY KEY,
            reminder_id  TEXT NOT NULL,
            completed_at TEXT NOT NULL,
            completed_by TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counters (
            name  TEXT PRIMARY KEY,
            value INTEGER NOT NULL DEFAULT 0
        );

        INSERT OR IGNORE INTO counters (name, value) VALUES ('family_id', 0);
        INSERT OR IGNORE INTO counters (name, value) VALUES ('reminder_id', 0);
        INSERT OR IGNORE INTO counters (name, value) VALUES ('completion_event_id', 0);
        "#,
    )?;
    Ok(())
}

fn index_completion_events(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_completion_events_reminder ON completion_events(reminder_id);",
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for (version, message, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        apply(conn).map_err(|e| AppError::Migration(format!("{}: {}", version, e)))?;

        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            params![version, message],
        )?;

        log::info!("migration applied: {}", version);
    }

    Ok(())
}

/// Versions recorded as applied, oldest first.
pub fn applied_migrations(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
