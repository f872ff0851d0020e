#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, TimeZone};
use rhometasks::core::Services;
use rhometasks::models::{NewReminder, RecurrenceInput};
use rhometasks::storage::{MemoryStorage, Storage};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// The binary, isolated from any real configuration file.
pub fn rht() -> Command {
    let mut cmd = cargo_bin_cmd!("rhometasks");
    cmd.env("HOME", env::temp_dir());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rhometasks.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// `--test init` against a fresh SQLite file.
pub fn init_db(db_path: &str) {
    rht()
        .args(["--db", db_path, "--backend", "sqlite", "--test", "init"])
        .assert()
        .success();
}

/// Local noon of the given day.
pub fn noon(y: i32, m: u32, d: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(y, m, d, 12, 0, 0)
        .earliest()
        .expect("valid local noon")
}

pub fn memory_services() -> (Arc<dyn Storage>, Services) {
    let store: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    (store.clone(), Services::new(store))
}

pub fn weekly_request(family_id: &str, member: &str, days: &[&str]) -> NewReminder {
    NewReminder {
        title: "Trash".into(),
        family_id: family_id.into(),
        family_member: member.into(),
        recurrence: RecurrenceInput {
            kind: "weekly".into(),
            days: days.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        },
        ..Default::default()
    }
}
