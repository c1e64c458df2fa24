use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiant fort d'une définition d'événement (attribué par l'API distante).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Variante d'affichage. Tout ce qui n'est pas `message` est un `event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EventKind {
    #[default]
    Event,
    Message,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Event => "event",
            EventKind::Message => "message",
        }
    }
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<&str> for EventKind {
    fn from(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("message") {
            EventKind::Message
        } else {
            EventKind::Event
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Définition d'événement récurrent telle que renvoyée par l'API.
///
/// Seuls `id`, `title`, `cron` et `kind` comptent pour le dépliage ; le reste
/// est transporté tel quel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: EventId,
    pub title: String,
    #[serde(alias = "recurrencePattern", alias = "recurrence_pattern")]
    pub cron: String,
    #[serde(default, rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Durée en minutes.
    #[serde(default, alias = "durationMinutes", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Décalages de rappel, en minutes avant l'occurrence.
    #[serde(default, alias = "minutesBefore", skip_serializing_if = "Vec::is_empty")]
    pub minutes_before: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<i64>,
    #[serde(default, alias = "groupId", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default, alias = "creatorId", skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i64>,
    /// Décalage saisi à la création ; le dépliage utilise le fuseau d'affichage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<i32>,
    #[serde(default = "default_is_cycle", alias = "isCycle")]
    pub is_cycle: bool,
    #[serde(default, alias = "eventHappened")]
    pub event_happened: bool,
}

fn default_is_cycle() -> bool {
    true
}

impl EventDefinition {
    pub fn new<T: Into<String>, C: Into<String>>(id: i64, title: T, cron: C) -> Self {
        Self {
            id: EventId::new(id),
            title: title.into(),
            cron: cron.into(),
            kind: EventKind::Event,
            description: None,
            duration: None,
            minutes_before: Vec::new(),
            tags: Vec::new(),
            group_id: None,
            creator_id: None,
            timezone: None,
            is_cycle: true,
            event_happened: false,
        }
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_reminders(mut self, minutes_before: Vec<i64>) -> Self {
        self.minutes_before = minutes_before;
        self
    }
}

/// Une définition instanciée à un instant précis, exprimé dans le fuseau d'affichage.
///
/// `source_id` n'est pas unique : toutes les occurrences d'une même
/// définition le partagent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    pub source_id: EventId,
    pub title: String,
    pub instant: DateTime<Tz>,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl Occurrence {
    pub fn from_definition(def: &EventDefinition, instant: DateTime<Tz>) -> Self {
        Self {
            source_id: def.id,
            title: def.title.clone(),
            instant,
            kind: def.kind,
        }
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.instant.with_timezone(&Utc)
    }
}
