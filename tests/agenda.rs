#![forbid(unsafe_code)]
use cadence::{expand, filter_by_title, group_by_day, DaySection, EventDefinition, Occurrence};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Moscow;

fn sample() -> Vec<Occurrence> {
    let defs = vec![
        EventDefinition::new(1, "Standup", "0 9 * * *"),
        EventDefinition::new(2, "Planning", "30 8 * * mon"),
    ];
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
    expand(&defs, start, start + Duration::days(3), 180)
}

fn render(sections: &[DaySection]) -> String {
    let mut lines = Vec::new();
    for s in sections {
        lines.push(s.label());
        for o in &s.entries {
            lines.push(format!("  {} {}", o.instant.format("%H:%M"), o.title));
        }
    }
    lines.join("\n")
}

#[test]
fn today_section_always_present() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let sections = group_by_day(&sample(), Moscow, today);

    assert_eq!(sections.len(), 4);
    assert!(sections[0].is_today);
    assert!(sections[0].entries.is_empty());
    assert!(sections.iter().skip(1).all(|s| !s.is_today));

    insta::assert_snapshot!(render(&sections), @r"
    Sun 01 Jun 2025
    Mon 02 Jun 2025
      08:30 Planning
      09:00 Standup
    Tue 03 Jun 2025
      09:00 Standup
    Wed 04 Jun 2025
      09:00 Standup
    ");
}

#[test]
fn entries_sorted_by_time_of_day_within_a_day() {
    let mut occ = sample();
    occ.reverse();
    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let sections = group_by_day(&occ, Moscow, today);

    assert_eq!(sections.len(), 3);
    assert!(sections[0].is_today);
    let titles: Vec<&str> = sections[0].entries.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, vec!["Planning", "Standup"]);
    for s in &sections {
        assert!(s.entries.iter().all(|o| o.instant.date_naive() == s.date));
    }
}

#[test]
fn buckets_follow_display_zone_not_utc() {
    // 23:30 UTC le 2 juin = 02:30 le 3 juin à Moscou
    let defs = vec![EventDefinition::new(1, "Late", "30 2 * * *")];
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
    let occ = expand(&defs, start, start + Duration::days(1), 180);
    assert_eq!(occ.len(), 1);
    assert_eq!(occ[0].utc(), Utc.with_ymd_and_hms(2025, 6, 2, 23, 30, 0).unwrap());

    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let sections = group_by_day(&occ, Moscow, today);
    assert_eq!(sections.len(), 2);
    assert!(sections[0].entries.is_empty());
    assert_eq!(sections[1].date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
}

#[test]
fn title_filter_keeps_today_and_matching_days() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let sections = filter_by_title(group_by_day(&sample(), Moscow, today), "PLAN");

    assert_eq!(sections.len(), 2);
    assert!(sections[0].is_today);
    assert_eq!(sections[1].entries.len(), 1);
    assert_eq!(sections[1].entries[0].title, "Planning");
}
