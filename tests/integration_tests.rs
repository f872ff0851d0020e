use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db, rht, setup_test_db};

fn sqlite(db_path: &str) -> Vec<String> {
    vec![
        "--db".to_string(),
        db_path.to_string(),
        "--backend".to_string(),
        "sqlite".to_string(),
    ]
}

fn add_smith_family(db_path: &str) {
    rht()
        .args(sqlite(db_path))
        .args(["family", "add", "Smith", "--member", "Alice", "--member", "Bob"])
        .assert()
        .success()
        .stdout(contains("\"id\": \"fam1\""))
        .stdout(contains("Alice"));
}

fn add_weekly_trash(db_path: &str) {
    rht()
        .args(sqlite(db_path))
        .args([
            "reminder",
            "add",
            "--title",
            "Trash",
            "--family",
            "fam1",
            "--member",
            "Alice",
            "--recurrence",
            "weekly",
            "--days",
            "monday,thursday",
        ])
        .assert()
        .success()
        .stdout(contains("\"id\": \"rem1\""))
        .stdout(contains("\"type\": \"weekly\""));
}

#[test]
fn test_init_applies_migrations() {
    let db_path = setup_test_db("init_applies_migrations");
    init_db(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args(["db", "--migrations"])
        .assert()
        .success()
        .stdout(contains("20250601_0001_create_core_tables"))
        .stdout(contains("20250702_0002_completion_event_index"));
}

#[test]
fn test_family_lifecycle() {
    let db_path = setup_test_db("family_lifecycle");
    init_db(&db_path);
    add_smith_family(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args(["family", "add-member", "fam1", "Carol"])
        .assert()
        .success()
        .stdout(contains("Carol"));

    rht()
        .args(sqlite(&db_path))
        .args(["family", "remove-member", "fam1", "Bob"])
        .assert()
        .success()
        .stdout(contains("Bob").not());

    rht()
        .args(sqlite(&db_path))
        .args(["family", "del", "fam1"])
        .assert()
        .success();

    rht()
        .args(sqlite(&db_path))
        .args(["family", "show", "fam1"])
        .assert()
        .code(2)
        .stderr(contains("family not found: fam1"));
}

#[test]
fn test_reminder_add_rejects_unknown_member() {
    let db_path = setup_test_db("reminder_unknown_member");
    init_db(&db_path);
    add_smith_family(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args([
            "reminder", "add", "--title", "Dishes", "--family", "fam1", "--member", "Zed",
        ])
        .assert()
        .code(2)
        .stderr(contains("Family member not found: Zed"));

    rht()
        .args(sqlite(&db_path))
        .args([
            "reminder", "add", "--title", "Dishes", "--family", "fam7", "--member", "Alice",
        ])
        .assert()
        .code(2)
        .stderr(contains("Family not found: fam7"));
}

#[test]
fn test_reminder_done_keeps_recurring_open_and_logs_event() {
    let db_path = setup_test_db("reminder_done_recurring");
    init_db(&db_path);
    add_smith_family(&db_path);
    add_weekly_trash(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "done", "rem1"])
        .assert()
        .success()
        .stdout(contains("\"completed\": false"))
        .stdout(contains("\"completed_at\": null").not());

    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "undone", "rem1"])
        .assert()
        .success()
        .stdout(contains("\"completed_at\": null"));

    rht()
        .args(sqlite(&db_path))
        .args(["event", "list", "rem1"])
        .assert()
        .success()
        .stdout(contains("cev1"))
        .stdout(contains("cev2"))
        .stdout(contains("\"completed_by\": \"Alice\""));
}

#[test]
fn test_reminder_patch_json() {
    let db_path = setup_test_db("reminder_patch_json");
    init_db(&db_path);
    add_smith_family(&db_path);
    add_weekly_trash(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args([
            "reminder",
            "patch",
            "rem1",
            r#"{"title":"Recycling","family_member":"Bob","unknown":1}"#,
        ])
        .assert()
        .success()
        .stdout(contains("\"title\": \"Recycling\""))
        .stdout(contains("\"family_member\": \"Bob\""));

    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "patch", "rem1", "[1,2]"])
        .assert()
        .code(2)
        .stderr(contains("Invalid payload"));
}

#[test]
fn test_reminder_list_on_day() {
    let db_path = setup_test_db("reminder_list_on_day");
    init_db(&db_path);
    add_smith_family(&db_path);
    add_weekly_trash(&db_path);

    // 2025-06-02 is a Monday, 2025-06-03 a Tuesday
    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "list", "--on", "2025-06-02"])
        .assert()
        .success()
        .stdout(contains("rem1"));

    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "list", "--on", "2025-06-03"])
        .assert()
        .success()
        .stdout(contains("rem1").not());

    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "list", "--on", "June 2nd"])
        .assert()
        .code(2);
}

#[test]
fn test_reminder_list_pending_needs_a_day() {
    let db_path = setup_test_db("reminder_list_pending_needs_a_day");
    init_db(&db_path);
    add_smith_family(&db_path);
    add_weekly_trash(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "list", "--pending"])
        .assert()
        .code(2);

    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "list", "--on", "2025-06-02", "--pending"])
        .assert()
        .success()
        .stdout(contains("rem1"));
}

#[test]
fn test_reminder_next_count_is_bounded() {
    let db_path = setup_test_db("reminder_next_count_is_bounded");
    init_db(&db_path);
    add_smith_family(&db_path);
    add_weekly_trash(&db_path);

    for count in ["0", "1001", "18446744073709551615"] {
        rht()
            .args(sqlite(&db_path))
            .args(["reminder", "next", "rem1", "--count", count])
            .assert()
            .code(2);
    }
}

#[test]
fn test_reminder_next_after() {
    let db_path = setup_test_db("reminder_next_after");
    init_db(&db_path);
    add_smith_family(&db_path);
    add_weekly_trash(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args([
            "reminder",
            "next",
            "rem1",
            "--after",
            "2025-06-02T12:00:00+00:00",
            "--count",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("2025-06-05"))
        .stdout(contains("2025-06-09"));
}

#[test]
fn test_unbounded_end_date_reads_back_empty() {
    let db_path = setup_test_db("unbounded_end_date");
    init_db(&db_path);
    add_smith_family(&db_path);
    add_weekly_trash(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args(["reminder", "show", "rem1"])
        .assert()
        .success()
        .stdout(contains("\"end_date\": \"\""))
        .stdout(contains("2099").not());
}

#[test]
fn test_log_and_recalc_counters() {
    let db_path = setup_test_db("log_and_recalc");
    init_db(&db_path);
    add_smith_family(&db_path);

    rht()
        .args(sqlite(&db_path))
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("Saved family 'Smith'"));

    rht()
        .args(sqlite(&db_path))
        .args(["db", "--recalc-counters"])
        .assert()
        .success()
        .stdout(contains("\"family_id\": 1"));
}

#[test]
fn test_file_backend_persists_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_string_lossy().to_string();

    rht()
        .args(["--db", &data_dir, "--backend", "file", "--test", "init"])
        .assert()
        .success();

    rht()
        .args(["--db", &data_dir, "--backend", "file"])
        .args(["family", "add", "Smith", "-m", "Alice"])
        .assert()
        .success();

    rht()
        .args(["--db", &data_dir, "--backend", "file", "family", "list"])
        .assert()
        .success()
        .stdout(contains("Smith"));

    assert!(dir.path().join("families.json").exists());
}
