use crate::expander::Expander;
use crate::model::{EventDefinition, EventId, Occurrence};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::slice;
use tracing::{debug, warn};

/// Rappel à envoyer `minutes_before` minutes avant une occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reminder {
    pub source_id: EventId,
    pub title: String,
    pub occurrence_at: DateTime<Tz>,
    pub notice_at: DateTime<Tz>,
    pub minutes_before: i64,
}

/// Permet de customiser le rendu du message (texte, messagerie, etc.).
pub trait ReminderRenderer {
    fn render(&self, reminder: &Reminder) -> String;
}

/// Gabarit texte simple pour un message de rappel.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReminder;

impl ReminderRenderer for TextReminder {
    fn render(&self, reminder: &Reminder) -> String {
        let when = reminder.occurrence_at.format("%d/%m/%Y à %H:%M");
        if reminder.minutes_before == 0 {
            format!("Rappel : « {} » commence maintenant ({when}).", reminder.title)
        } else {
            format!(
                "Rappel : « {} » commence dans {} min ({when}).",
                reminder.title, reminder.minutes_before
            )
        }
    }
}

impl Expander {
    /// Rappels dont l'heure d'envoi tombe dans `[from, to)`, triés par heure d'envoi.
    ///
    /// Les décalages négatifs sont ignorés, ceux qui débordent les dates aussi.
    pub fn reminders_between(
        &self,
        definitions: &[EventDefinition],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        offset_minutes: i32,
    ) -> Vec<Reminder> {
        let tz = self.resolve_zone(offset_minutes);
        self.reminders_between_in(definitions, from, to, tz)
    }

    /// Variante de [`Expander::reminders_between`] avec une zone déjà résolue.
    pub fn reminders_between_in(
        &self,
        definitions: &[EventDefinition],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        tz: Tz,
    ) -> Vec<Reminder> {
        let mut out = Vec::new();

        for def in definitions {
            let offsets = reminder_offsets(def, from, to);
            let (Some(&(min, _)), Some(&(max, _))) = (offsets.first(), offsets.last()) else {
                continue;
            };

            // notice = occ - m dans [from, to)  <=>  occ dans [from + m, to + m)
            let (Some(window_start), Some(window_end)) = (shift(from, min), shift(to, max)) else {
                continue;
            };
            let occurrences =
                self.expand_in(slice::from_ref(def), window_start, window_end, tz);

            for occ in &occurrences {
                for &(m, delta) in &offsets {
                    if let Some(reminder) = reminder_for(occ, m, delta, from, to) {
                        out.push(reminder);
                    }
                }
            }
        }

        out.sort_by_key(|r| r.notice_at.with_timezone(&Utc));
        out
    }
}

fn shift(at: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    at.checked_add_signed(Duration::try_minutes(minutes)?)
}

/// Décalages valides (avec leur durée), triés et dédoublonnés.
fn reminder_offsets(
    def: &EventDefinition,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<(i64, Duration)> {
    let mut offsets: Vec<(i64, Duration)> = def
        .minutes_before
        .iter()
        .copied()
        .filter_map(|m| {
            if m < 0 {
                debug!(event_id = %def.id, minutes_before = m, "ignoring negative reminder offset");
                return None;
            }
            let delta = Duration::try_minutes(m);
            if delta.is_none() || shift(from, m).is_none() || shift(to, m).is_none() {
                warn!(event_id = %def.id, minutes_before = m, "ignoring out of range reminder offset");
                return None;
            }
            delta.map(|d| (m, d))
        })
        .collect();
    offsets.sort_unstable_by_key(|&(m, _)| m);
    offsets.dedup_by_key(|&mut (m, _)| m);
    offsets
}

fn reminder_for(
    occ: &Occurrence,
    minutes_before: i64,
    delta: Duration,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Option<Reminder> {
    let notice_at = occ.instant.checked_sub_signed(delta)?;
    let notice_utc = notice_at.with_timezone(&Utc);
    (from <= notice_utc && notice_utc < to).then(|| Reminder {
        source_id: occ.source_id,
        title: occ.title.clone(),
        occurrence_at: occ.instant,
        notice_at,
        minutes_before,
    })
}

/// Rappels avec l'expander par défaut.
pub fn reminders_between(
    definitions: &[EventDefinition],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    offset_minutes: i32,
) -> Vec<Reminder> {
    Expander::default().reminders_between(definitions, from, to, offset_minutes)
}
