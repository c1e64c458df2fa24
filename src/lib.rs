#![forbid(unsafe_code)]
//! Cadence — dépliage d'événements récurrents (cron) en occurrences datées.
//!
//! - Expressions cron 5/6 champs, lues dans le fuseau d'affichage.
//! - Fenêtre demi-ouverte `[start, end)`, itération toujours bornée.
//! - Une définition invalide est ignorée sans interrompre le lot.
//! - Table figée des fuseaux, repli sur UTC pour un décalage inconnu.

pub mod agenda;
pub mod cron;
pub mod expander;
pub mod ics;
pub mod io;
pub mod model;
pub mod notification;
pub mod rule;
pub mod timezone;

pub use agenda::{filter_by_title, group_by_day, DaySection};
pub use cron::{CronError, CronExpr, CronIter};
pub use expander::{expand, DefinitionExpansion, ExpandError, Expander};
pub use ics::{export_ics, export_ics_in, IcsOptions};
pub use model::{EventDefinition, EventId, EventKind, Occurrence};
pub use notification::{reminders_between, Reminder, ReminderRenderer, TextReminder};
pub use rule::{RecurrenceRule, Repeat};
pub use timezone::{TimezoneEntry, TimezoneTable, ZoneResolution, SUPPORTED_TIMEZONES};
