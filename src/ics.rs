//! Export iCalendar des occurrences dépliées.

use crate::expander::Expander;
use crate::model::{EventDefinition, Occurrence};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike};
use std::slice;
use tracing::warn;

/// Paramètres de l'export .ics
#[derive(Debug, Clone)]
pub struct IcsOptions {
    pub prod_id: String,
    /// Domaine utilisé dans les UID (`event-{id}-{ts}@{domain}`).
    pub domain: String,
    /// Durée appliquée quand la définition n'en porte pas.
    pub default_duration_minutes: i64,
    /// Valeur de DTSTAMP.
    pub stamp: DateTime<Utc>,
    /// Nombre maximal de VEVENT par définition.
    pub max_events_per_definition: usize,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            prod_id: "-//Cadence Calendar//EN".to_string(),
            domain: "cadence.local".to_string(),
            default_duration_minutes: 60,
            stamp: Utc::now(),
            max_events_per_definition: 1000,
        }
    }
}

/// Génère un calendrier .ics pour les définitions sur `[start, end)`.
///
/// Chaque définition est lue dans son propre fuseau (`timezone`) ; à défaut,
/// dans celui de `offset_minutes`. Les définitions ponctuelles déjà passées
/// sont ignorées ; les autres ponctuelles ne donnent que leur première
/// occurrence.
pub fn export_ics(
    expander: &Expander,
    definitions: &[EventDefinition],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset_minutes: i32,
    opts: &IcsOptions,
) -> String {
    let tz = expander.resolve_zone(offset_minutes);
    export_ics_in(expander, definitions, start, end, tz, opts)
}

/// Variante de [`export_ics`] avec une zone par défaut déjà résolue.
pub fn export_ics_in(
    expander: &Expander,
    definitions: &[EventDefinition],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: Tz,
    opts: &IcsOptions,
) -> String {
    let mut cal = Calendar::new();

    for def in definitions {
        if def.event_happened && !def.is_cycle {
            continue;
        }
        let zone = definition_zone(expander, def, tz);
        let expansions = expander.expand_each_in(slice::from_ref(def), start, end, zone);
        let occurrences = expansions.first().map(|e| e.occurrences()).unwrap_or(&[]);

        let limit = if def.is_cycle {
            opts.max_events_per_definition
        } else {
            1
        };
        if def.is_cycle && occurrences.len() > limit {
            warn!(
                event_id = %def.id,
                limit,
                "ics event limit reached, remaining occurrences dropped"
            );
        }
        for occ in occurrences.iter().take(limit) {
            cal.push(build_event(def, occ, opts));
        }
    }

    normalize_header(&cal.done().to_string(), opts)
}

/// Fuseau propre à la définition s'il figure dans la table, sinon `default`.
fn definition_zone(expander: &Expander, def: &EventDefinition, default: Tz) -> Tz {
    let Some(offset) = def.timezone else {
        return default;
    };
    match expander.table().find(offset) {
        Some(entry) => entry.zone,
        None => {
            warn!(
                event_id = %def.id,
                offset_minutes = offset,
                "unsupported event timezone, using export zone"
            );
            default
        }
    }
}

fn build_event(def: &EventDefinition, occ: &Occurrence, opts: &IcsOptions) -> icalendar::Event {
    let start = occ.utc();
    let minutes = match def.duration {
        Some(d) if d > 0 => i64::from(d),
        _ => opts.default_duration_minutes,
    };
    let end = start + Duration::minutes(minutes);

    let mut ev = icalendar::Event::new();
    ev.uid(&format!(
        "event-{}-{}@{}",
        def.id,
        start.timestamp(),
        opts.domain
    ));
    ev.summary(&def.title);
    ev.starts(start);
    ev.ends(end);
    ev.timestamp(opts.stamp);
    if let Some(ref desc) = def.description {
        ev.description(desc);
    }
    ev.done()
}

/// Remplace l'en-tête produit par `icalendar` (PRODID, CALSCALE, METHOD).
fn normalize_header(ics: &str, opts: &IcsOptions) -> String {
    let mut out = String::with_capacity(ics.len());
    for line in ics.lines() {
        if line.starts_with("PRODID:") || line.starts_with("CALSCALE:") || line.starts_with("METHOD:") {
            continue;
        }
        out.push_str(line);
        out.push_str("\r\n");
        if line == "BEGIN:VCALENDAR" {
            out.push_str(&format!("PRODID:{}\r\n", opts.prod_id));
            out.push_str("CALSCALE:GREGORIAN\r\n");
            out.push_str("METHOD:PUBLISH\r\n");
        }
    }
    out
}
