#![forbid(unsafe_code)]
use cadence::{export_ics, io, EventDefinition, EventKind, Expander, IcsOptions};
use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Europe::Moscow;
use std::fs;
use tempfile::tempdir;

fn ics_definitions() -> Vec<EventDefinition> {
    let mut standup = EventDefinition::new(1, "Standup", "0 9 * * *").with_duration(30);
    standup.description = Some("Daily sync".into());

    let mut once = EventDefinition::new(2, "Kickoff", "0 10 2 6 *");
    once.is_cycle = false;

    let mut done = EventDefinition::new(3, "Done", "0 11 * * *");
    done.is_cycle = false;
    done.event_happened = true;

    vec![standup, once, done, EventDefinition::new(4, "Broken", "bad")]
}

#[test]
fn ics_export_lists_each_occurrence() {
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
    let opts = IcsOptions {
        stamp: start,
        ..IcsOptions::default()
    };
    let ics = export_ics(
        &Expander::default(),
        &ics_definitions(),
        start,
        start + Duration::days(3),
        180,
        &opts,
    );

    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.contains("PRODID:-//Cadence Calendar//EN\r\n"));
    assert!(ics.contains("METHOD:PUBLISH\r\n"));
    assert_eq!(ics.matches("PRODID:").count(), 1);
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 4);
    assert_eq!(ics.matches("SUMMARY:Standup").count(), 3);
    assert_eq!(ics.matches("SUMMARY:Kickoff").count(), 1);
    assert!(!ics.contains("SUMMARY:Done"));
    assert!(!ics.contains("SUMMARY:Broken"));

    assert!(ics.contains("UID:event-1-1748844000@cadence.local"));
    assert!(ics.contains("DTSTART:20250602T060000Z"));
    assert!(ics.contains("DTEND:20250602T063000Z"));
    assert!(ics.contains("DESCRIPTION:Daily sync"));
    // sans durée : une heure
    assert!(ics.contains("UID:event-2-1748847600@cadence.local"));
    assert!(ics.contains("DTEND:20250602T080000Z"));
}

#[test]
fn ics_export_reads_each_definition_in_its_own_zone() {
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
    let mut new_york = EventDefinition::new(1, "NY standup", "0 9 * * *");
    new_york.timezone = Some(-300);
    let local = EventDefinition::new(2, "Moscow standup", "0 9 * * *");
    let mut unknown = EventDefinition::new(3, "Elsewhere", "0 9 * * *");
    unknown.timezone = Some(999);

    let opts = IcsOptions {
        stamp: start,
        ..IcsOptions::default()
    };
    let ics = export_ics(
        &Expander::default(),
        &[new_york, local, unknown],
        start,
        start + Duration::days(1),
        180,
        &opts,
    );

    assert!(ics.contains("UID:event-1-1748869200@cadence.local"));
    assert!(ics.contains("DTSTART:20250602T130000Z"));
    assert!(ics.contains("UID:event-2-1748844000@cadence.local"));
    assert!(ics.contains("UID:event-3-1748844000@cadence.local"));
    assert_eq!(ics.matches("DTSTART:20250602T060000Z").count(), 2);
}

#[test]
fn ics_export_limits_events_per_definition() {
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
    let opts = IcsOptions {
        stamp: start,
        max_events_per_definition: 2,
        ..IcsOptions::default()
    };
    let defs = vec![
        EventDefinition::new(1, "Standup", "0 9 * * *"),
        EventDefinition::new(2, "Review", "0 17 * * *"),
    ];
    let ics = export_ics(&Expander::default(), &defs, start, start + Duration::days(5), 180, &opts);

    assert_eq!(ics.matches("SUMMARY:Standup").count(), 2);
    assert_eq!(ics.matches("SUMMARY:Review").count(), 2);
}

#[test]
fn json_definitions_accept_api_shape() {
    let dir = tempdir().unwrap();
    let wrapped = dir.path().join("events.json");
    fs::write(
        &wrapped,
        r#"{"events":[{"id":1,"title":"Standup","cron":"0 9 * * *","type":"message",
            "isCycle":true,"minutesBefore":[10],"groupId":3,"timezone":180}]}"#,
    )
    .unwrap();
    let defs = io::load_definitions(&wrapped).unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].kind, EventKind::Message);
    assert_eq!(defs[0].minutes_before, vec![10]);
    assert_eq!(defs[0].group_id, Some(3));

    let bare = dir.path().join("bare.json");
    fs::write(
        &bare,
        r#"[{"id":5,"title":"Poll","recurrencePattern":"0 12 * * fri","type":"poll"}]"#,
    )
    .unwrap();
    let defs = io::load_definitions_json(&bare).unwrap();
    assert_eq!(defs[0].cron, "0 12 * * fri");
    assert_eq!(defs[0].kind, EventKind::Event);
    assert!(defs[0].is_cycle);
}

#[test]
fn csv_import_and_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.csv");
    fs::write(
        &input,
        "id,title,cron,type,duration\n1,Standup,0 9 * * *,event,15\n2,Note,0 18 * * *,message\n",
    )
    .unwrap();
    let defs = io::load_definitions(&input).unwrap();
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].duration, Some(15));
    assert_eq!(defs[1].kind, EventKind::Message);
    assert_eq!(defs[1].duration, None);

    let start = io::parse_point("2025-06-02", Moscow).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 21, 0, 0).unwrap());
    let occ = Expander::default().expand(&defs, start, start + Duration::days(1), 180);
    assert_eq!(occ.len(), 2);

    let out = dir.path().join("out.csv");
    io::export_occurrences_csv(&out, &occ).unwrap();
    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "source_id,title,instant,type\n\
         1,Standup,2025-06-02T09:00:00+03:00,event\n\
         2,Note,2025-06-02T18:00:00+03:00,message\n"
    );

    let json = dir.path().join("out.json");
    io::export_occurrences_json(&json, &occ).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value[0]["source_id"], 1);
    assert_eq!(value[1]["type"], "message");
}

#[test]
fn invalid_csv_row_is_an_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "id,title,cron,type\nx,Standup,0 9 * * *,event\n").unwrap();
    assert!(io::import_definitions_csv(&input).is_err());
}
