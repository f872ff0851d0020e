//! SQLite storage (rusqlite).
//!
//! One connection behind a mutex. Timestamps are RFC 3339 TEXT columns; an
//! unbounded recurrence is written as [`NO_END_DATE_SENTINEL`] because the
//! end-date column is always filled, and read back as `None`. The sentinel
//! never leaves this module.

pub mod log;
pub mod migrate;

use super::{CounterKind, Storage};
use crate::errors::{AppError, AppResult};
use crate::models::{CompletionEvent, Family, RecurrencePattern, RecurrenceType, Reminder};
use crate::utils::date::parse_stored_timestamp;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use self::log::{LogRow, load_log, ttlog_quiet};
use self::migrate::run_pending_migrations;

pub const NO_END_DATE_SENTINEL: &str = "2099-12-31T23:59:59Z";

const REMINDER_COLUMNS: &str = "id, title, description, due_date, recurrence_type, \
     recurrence_days, recurrence_date, recurrence_end_date, completed, completed_at, \
     family_id, family_member";

pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (creating if needed) the database file and apply pending
    /// migrations.
    pub fn open(path: &str) -> AppResult<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_connection(Connection::open(Path::new(path))?)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> AppResult<Self> {
        run_pending_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Storage("sqlite connection lock poisoned".into()))
    }

    /// Rows of the internal operation log, most recent first.
    pub fn recent_log(&self, limit: usize) -> AppResult<Vec<LogRow>> {
        let conn = self.conn()?;
        load_log(&conn, limit)
    }

    /// Applied schema migrations, oldest first.
    pub fn applied_migrations(&self) -> AppResult<Vec<String>> {
        let conn = self.conn()?;
        migrate::applied_migrations(&conn)
    }
}

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn encode_ts(dt: &DateTime<Local>) -> String {
    dt.to_rfc3339()
}

fn decode_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Local>> {
    parse_stored_timestamp(raw)
        .ok_or_else(|| conversion_error(idx, AppError::InvalidDate(raw.to_string())))
}

fn decode_opt_ts(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<DateTime<Local>>> {
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => decode_ts(idx, s).map(Some),
    }
}

pub fn encode_end_date(end: Option<&DateTime<Local>>) -> String {
    match end {
        Some(dt) => encode_ts(dt),
        None => NO_END_DATE_SENTINEL.to_string(),
    }
}

pub fn decode_end_date(raw: Option<&str>) -> Option<DateTime<Local>> {
    match raw {
        None | Some("") | Some(NO_END_DATE_SENTINEL) => None,
        Some(s) => {
            let parsed = parse_stored_timestamp(s);
            if parsed.is_none() {
                ::log::warn!("ignoring unparseable recurrence end date '{}'", s);
            }
            parsed
        }
    }
}

fn map_family(row: &Row) -> rusqlite::Result<Family> {
    let members_json: String = row.get("members")?;
    let members: Vec<String> = serde_json::from_str(&members_json)
        .map_err(|e| conversion_error(2, AppError::Json(e)))?;

    Ok(Family {
        id: row.get("id")?,
        name: row.get("name")?,
        members,
    })
}

fn map_reminder(row: &Row) -> rusqlite::Result<Reminder> {
    let kind_str: String = row.get("recurrence_type")?;
    let kind = RecurrenceType::from_db_str(&kind_str).ok_or_else(|| {
        conversion_error(
            4,
            AppError::InvalidRecurrence(format!("Invalid recurrence type: {}", kind_str)),
        )
    })?;

    let days_json: Option<String> = row.get("recurrence_days")?;
    let days: Vec<String> = match days_json.as_deref() {
        None | Some("") | Some("null") => Vec::new(),
        Some(s) => serde_json::from_str(s).map_err(|e| conversion_error(5, AppError::Json(e)))?,
    };

    let date: Option<i64> = row.get("recurrence_date")?;
    let end_raw: Option<String> = row.get("recurrence_end_date")?;

    Ok(Reminder {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
        due_date: decode_opt_ts(3, row.get("due_date")?)?,
        recurrence: RecurrencePattern {
            kind,
            days,
            date: date.and_then(|d| u32::try_from(d).ok()).filter(|d| *d > 0),
            end_date: decode_end_date(end_raw.as_deref()),
        },
        completed: row.get::<_, i64>("completed")? != 0,
        completed_at: decode_opt_ts(9, row.get("completed_at")?)?,
        family_id: row.get("family_id")?,
        family_member: row.get("family_member")?,
    })
}

fn map_event(row: &Row) -> rusqlite::Result<CompletionEvent> {
    let completed_at: String = row.get("completed_at")?;
    Ok(CompletionEvent {
        id: row.get("id")?,
        reminder_id: row.get("reminder_id")?,
        completed_at: decode_ts(2, &completed_at)?,
        completed_by: row.get("completed_by")?,
    })
}

fn delete_by_id(conn: &Connection, table: &str, kind: &'static str, id: &str) -> AppResult<()> {
    let affected = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
    if affected == 0 {
        return Err(AppError::not_found(kind, id));
    }
    ttlog_quiet(conn, "delete", id, &format!("Deleted {} {}", kind, id));
    Ok(())
}

/// Numeric suffix ordering, matching the other backends.
const ORDER_BY_ID: &str = "ORDER BY length(id) ASC, id ASC";

impl Storage for SqliteStorage {
    fn create_family(&self, family: &Family) -> AppResult<()> {
        let conn = self.conn()?;
        let members = serde_json::to_string(&family.members)?;
        conn.execute(
            "INSERT OR REPLACE INTO families (id, name, members) VALUES (?1, ?2, ?3)",
            params![family.id, family.name, members],
        )?;
        ttlog_quiet(&conn, "family", &family.id, &format!("Saved family '{}'", family.name));
        Ok(())
    }

    fn get_family(&self, id: &str) -> AppResult<Family> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, members FROM families WHERE id = ?1",
            [id],
            map_family,
        )
        .optional()?
        .ok_or_else(|| AppError::not_found("family", id))
    }

    fn list_families(&self) -> AppResult<Vec<Family>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, name, members FROM families {}",
            ORDER_BY_ID
        ))?;
        let rows = stmt.query_map([], map_family)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn delete_family(&self, id: &str) -> AppResult<()> {
        let conn = self.conn()?;
        delete_by_id(&conn, "families", "family", id)
    }

    fn create_reminder(&self, reminder: &Reminder) -> AppResult<()> {
        let conn = self.conn()?;
        let days = serde_json::to_string(&reminder.recurrence.days)?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO reminders ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                REMINDER_COLUMNS
            ),
            params![
                reminder.id,
                reminder.title,
                reminder.description,
                reminder.due_date.as_ref().map(encode_ts),
                reminder.recurrence.kind.to_db_str(),
                days,
                reminder.recurrence.date.map(i64::from),
                encode_end_date(reminder.recurrence.end_date.as_ref()),
                if reminder.completed { 1 } else { 0 },
                reminder.completed_at.as_ref().map(encode_ts),
                reminder.family_id,
                reminder.family_member,
            ],
        )?;
        ttlog_quiet(
            &conn,
            "reminder",
            &reminder.id,
            &format!("Saved reminder '{}'", reminder.title),
        );
        Ok(())
    }

    fn get_reminder(&self, id: &str) -> AppResult<Reminder> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM reminders WHERE id = ?1", REMINDER_COLUMNS),
            [id],
            map_reminder,
        )
        .optional()?
        .ok_or_else(|| AppError::not_found("reminder", id))
    }

    fn list_reminders(&self) -> AppResult<Vec<Reminder>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reminders {}",
            REMINDER_COLUMNS, ORDER_BY_ID
        ))?;
        let rows = stmt.query_map([], map_reminder)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn delete_reminder(&self, id: &str) -> AppResult<()> {
        let conn = self.conn()?;
        delete_by_id(&conn, "reminders", "reminder", id)
    }

    fn create_completion_event(&self, event: &CompletionEvent) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO completion_events (id, reminder_id, completed_at, completed_by)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                event.id,
                event.reminder_id,
                encode_ts(&event.completed_at),
                event.completed_by
            ],
        )?;
        ttlog_quiet(
            &conn,
            "completion",
            &event.reminder_id,
            &format!("{} completed by {}", event.id, event.completed_by),
        );
        Ok(())
    }

    fn get_completion_event(&self, id: &str) -> AppResult<CompletionEvent> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, reminder_id, completed_at, completed_by FROM completion_events WHERE id = ?1",
            [id],
            map_event,
        )
        .optional()?
        .ok_or_else(|| AppError::not_found("completion event", id))
    }

    fn list_completion_events(&self, reminder_id: &str) -> AppResult<Vec<CompletionEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, reminder_id, completed_at, completed_by FROM completion_events
             WHERE reminder_id = ?1 {}",
            ORDER_BY_ID
        ))?;
        let rows = stmt.query_map([reminder_id], map_event)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn list_all_completion_events(&self) -> AppResult<Vec<CompletionEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, reminder_id, completed_at, completed_by FROM completion_events {}",
            ORDER_BY_ID
        ))?;
        let rows = stmt.query_map([], map_event)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn delete_completion_event(&self, id: &str) -> AppResult<()> {
        let conn = self.conn()?;
        delete_by_id(&conn, "completion_events", "completion event", id)
    }

    fn get_counter(&self, kind: CounterKind) -> AppResult<i64> {
        let conn = self.conn()?;
        let value: Option<i64> = conn
            .query_row(
                "SELECT value FROM counters WHERE name = ?1",
                [kind.to_db_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    fn set_counter(&self, kind: CounterKind, value: i64) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO counters (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            params![kind.to_db_str(), value],
        )?;
        Ok(())
    }

    fn next_id(&self, kind: CounterKind) -> AppResult<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO counters (name, value) VALUES (?1, 1)
             ON CONFLICT(name) DO UPDATE SET value = value + 1",
            [kind.to_db_str()],
        )?;
        let value: i64 = tx.query_row(
            "SELECT value FROM counters WHERE name = ?1",
            [kind.to_db_str()],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sentinel_is_written_for_unbounded_and_read_back_as_none() {
        assert_eq!(encode_end_date(None), NO_END_DATE_SENTINEL);
        assert_eq!(decode_end_date(Some(NO_END_DATE_SENTINEL)), None);
        assert_eq!(decode_end_date(Some("")), None);
        assert_eq!(decode_end_date(None), None);
    }

    #[test]
    fn real_end_dates_round_trip() {
        let end = Local.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).earliest().unwrap();
        let raw = encode_end_date(Some(&end));
        assert_eq!(decode_end_date(Some(&raw)), Some(end));
    }

    #[test]
    fn stored_sentinel_row_reads_unbounded() {
        let store = SqliteStorage::open_in_memory().unwrap();
        let r = Reminder::new(
            "rem1",
            "Trash",
            "",
            None,
            "fam1",
            "Alice",
            RecurrencePattern::weekly(&["monday"]),
        );
        store.create_reminder(&r).unwrap();

        let raw: String = store
            .conn()
            .unwrap()
            .query_row(
                "SELECT recurrence_end_date FROM reminders WHERE id = 'rem1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, NO_END_DATE_SENTINEL);
        assert_eq!(store.get_reminder("rem1").unwrap().recurrence.end_date, None);
    }

    #[test]
    fn migrations_are_recorded_once() {
        let store = SqliteStorage::open_in_memory().unwrap();
        {
            let conn = store.conn().unwrap();
            run_pending_migrations(&conn).unwrap();
        }
        assert_eq!(store.applied_migrations().unwrap().len(), 2);
    }

    #[test]
    fn rows_without_end_date_default_to_sentinel() {
        let store = SqliteStorage::open_in_memory().unwrap();
        {
            let conn = store.conn().unwrap();
            conn.execute(
                "INSERT INTO reminders (id, title, recurrence_type, family_id, family_member)
                 VALUES ('rem1', 'Bins', 'daily', 'fam1', 'Alice')",
                [],
            )
            .unwrap();
            let raw: String = conn
                .query_row(
                    "SELECT recurrence_end_date FROM reminders WHERE id = 'rem1'",
                    [],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(raw, NO_END_DATE_SENTINEL);
        }
        assert_eq!(store.get_reminder("rem1").unwrap().recurrence.end_date, None);
    }
}
