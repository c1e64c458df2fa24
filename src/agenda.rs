//! Regroupement par jour calendaire pour l'affichage.

use crate::model::Occurrence;
use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;

/// Une section d'agenda : un jour et ses occurrences, triées par heure.
#[derive(Debug, Clone, Serialize)]
pub struct DaySection {
    pub date: NaiveDate,
    pub is_today: bool,
    pub entries: Vec<Occurrence>,
}

impl DaySection {
    /// Libellé court, ex. `Mon 02 Jun 2025`.
    pub fn label(&self) -> String {
        self.date.format("%a %d %b %Y").to_string()
    }
}

/// Répartit les occurrences par jour de `tz`.
///
/// Les sections sont dans l'ordre des dates ; la section de `today` existe
/// toujours, même vide. Dans un jour, tri stable sur (heure, minute).
pub fn group_by_day(occurrences: &[Occurrence], tz: Tz, today: NaiveDate) -> Vec<DaySection> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Occurrence>> = BTreeMap::new();
    buckets.entry(today).or_default();

    for occ in occurrences {
        let local = occ.instant.with_timezone(&tz);
        buckets
            .entry(local.date_naive())
            .or_default()
            .push(occ.clone());
    }

    buckets
        .into_iter()
        .map(|(date, mut entries)| {
            entries.sort_by_key(|o| {
                let local = o.instant.with_timezone(&tz);
                (local.hour(), local.minute())
            });
            DaySection {
                date,
                is_today: date == today,
                entries,
            }
        })
        .collect()
}

/// Garde les entrées dont le titre contient `query` (sans casse).
///
/// Les sections vidées disparaissent, sauf celle du jour.
pub fn filter_by_title(sections: Vec<DaySection>, query: &str) -> Vec<DaySection> {
    let needle = query.to_lowercase();
    sections
        .into_iter()
        .filter_map(|mut section| {
            section
                .entries
                .retain(|o| o.title.to_lowercase().contains(&needle));
            (section.is_today || !section.entries.is_empty()).then_some(section)
        })
        .collect()
}
