#![forbid(unsafe_code)]
use assert_cmd::Command;
use chrono::Utc;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("cadence-cli").unwrap()
}

#[test]
fn expand_prints_local_instants() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.json");
    fs::write(&events, r#"[{"id":1,"title":"Standup","cron":"0 9 * * *"}]"#).unwrap();

    cli()
        .args(["--events", events.to_str().unwrap(), "--offset", "180"])
        .args(["expand", "--from", "2025-06-02T00:00:00Z", "--days", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 | 2025-06-02T09:00:00+03:00 | event | Standup",
        ))
        .stdout(predicate::str::contains("2025-06-04T09:00:00+03:00"))
        .stdout(predicate::str::contains("2025-06-05").not());
}

#[test]
fn expand_reports_skipped_definitions() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.json");
    fs::write(
        &events,
        r#"[{"id":1,"title":"Standup","cron":"0 9 * * *"},{"id":2,"title":"Broken","cron":"61 * * * *"}]"#,
    )
    .unwrap();
    let out = dir.path().join("occ.csv");

    cli()
        .args(["--events", events.to_str().unwrap()])
        .args(["expand", "--from", "2025-06-02", "--days", "1"])
        .args(["--out-csv", out.to_str().unwrap()])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Standup"))
        .stderr(predicate::str::contains("skipped event 2"));

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 2);
}

#[test]
fn negative_offset_is_accepted() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.csv");
    fs::write(&events, "id,title,cron,type\n1,Standup,0 9 * * *,event\n").unwrap();

    cli()
        .args(["--events", events.to_str().unwrap(), "--offset", "-300"])
        .args(["expand", "--from", "2025-06-02", "--days", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-06-02T09:00:00-04:00"));
}

#[test]
fn agenda_today_section_is_the_current_date() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.json");
    fs::write(&events, r#"[{"id":1,"title":"Standup","cron":"0 9 * * *"}]"#).unwrap();
    let today = Utc::now()
        .with_timezone(&chrono_tz::Europe::Moscow)
        .format("%a %d %b %Y")
        .to_string();

    cli()
        .args(["--events", events.to_str().unwrap(), "--offset", "180"])
        .args(["agenda", "--from", "2025-06-02", "--days", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(today))
        .stdout(predicate::str::contains("Mon 02 Jun 2025\n  09:00 Standup"));
}

#[test]
fn timezones_lists_bundled_table() {
    cli()
        .arg("timezones")
        .assert()
        .success()
        .stdout(predicate::str::contains("Europe/Moscow"))
        .stdout(predicate::str::contains("America/St_Johns"));
}

#[test]
fn rule_builds_weekly_expression() {
    cli()
        .args(["rule", "--date", "2025-06-02T09:15:00+03:00", "--every", "week"])
        .assert()
        .success()
        .stdout("15 9 * * 1\n");
}

#[test]
fn ics_written_to_file() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.json");
    fs::write(&events, r#"[{"id":1,"title":"Standup","cron":"0 9 * * *"}]"#).unwrap();
    let out = dir.path().join("cal.ics");

    cli()
        .args(["--events", events.to_str().unwrap()])
        .args(["ics", "--from", "2025-06-02", "--days", "2"])
        .args(["--out", out.to_str().unwrap()])
        .assert()
        .success();

    let ics = fs::read_to_string(&out).unwrap();
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
}
