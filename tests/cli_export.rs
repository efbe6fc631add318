use assert_cmd::Command;
use chrono::{Local, TimeZone};

use timestable::history::{GameHistory, GameHistoryEntry};
use timestable::store::SqliteSettingsStore;

#[test]
fn export_history_writes_csv_and_exits() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("settings.db");
    let out = dir.path().join("history.csv");

    {
        let store = SqliteSettingsStore::open(&db).unwrap();
        let mut history = GameHistory::default();
        let at = Local.timestamp_opt(1_700_000_000, 0).unwrap();
        history.record(GameHistoryEntry::new(100, 75, "1-10 × 2-12".to_string(), at));
        history.save(&store).unwrap();
    }

    Command::cargo_bin("timestable")
        .unwrap()
        .arg("--db")
        .arg(&db)
        .arg("--export-history")
        .arg(&out)
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id,date,score,time,ranges");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("1700000000000,"));
    assert!(lines[1].ends_with(",100,75,1-10 × 2-12"));
}

#[test]
fn export_with_fresh_database_is_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("history.csv");

    Command::cargo_bin("timestable")
        .unwrap()
        .arg("--db")
        .arg(dir.path().join("new.db"))
        .arg("--export-history")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "id,date,score,time,ranges\n"
    );
}

#[test]
fn refuses_to_start_without_a_tty() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("timestable")
        .unwrap()
        .arg("--db")
        .arg(dir.path().join("settings.db"))
        .write_stdin("")
        .assert()
        .failure();
}

#[test]
fn rejects_out_of_range_timer() {
    Command::cargo_bin("timestable")
        .unwrap()
        .args(["--timer", "2"])
        .assert()
        .failure();
}
