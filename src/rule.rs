//! Règle de répétition saisie dans le formulaire d'événement
//! (date + « tous les jours / semaines / mois »), traduite en cron.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    Day,
    Week,
    Month,
}

impl FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Repeat::Day),
            "week" | "weekly" => Ok(Repeat::Week),
            "month" | "monthly" => Ok(Repeat::Month),
            other => Err(format!("unknown repeat: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Première occurrence, avec le décalage choisi par l'utilisateur.
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub every_day: bool,
    #[serde(default)]
    pub every_week: bool,
    #[serde(default)]
    pub every_month: bool,
}

impl RecurrenceRule {
    pub fn once(date: DateTime<FixedOffset>) -> Self {
        Self {
            date,
            every_day: false,
            every_week: false,
            every_month: false,
        }
    }

    pub fn repeating(date: DateTime<FixedOffset>, repeat: Repeat) -> Self {
        let mut rule = Self::once(date);
        match repeat {
            Repeat::Day => rule.every_day = true,
            Repeat::Week => rule.every_week = true,
            Repeat::Month => rule.every_month = true,
        }
        rule
    }

    pub fn is_cycle(&self) -> bool {
        self.every_day || self.every_week || self.every_month
    }

    /// Décalage de la date en minutes, tel que stocké côté API.
    pub fn timezone_offset_minutes(&self) -> i32 {
        self.date.offset().local_minus_utc() / 60
    }

    /// Expression cron, champs lus dans l'heure locale de `date`.
    ///
    /// Plusieurs drapeaux : jour > semaine > mois. Sans drapeau, l'expression
    /// fixe jour et mois.
    pub fn expression(&self) -> String {
        let d = self.date;
        let (minute, hour) = (d.minute(), d.hour());
        if self.every_day {
            format!("{minute} {hour} * * *")
        } else if self.every_week {
            format!("{minute} {hour} * * {}", d.weekday().num_days_from_sunday())
        } else if self.every_month {
            format!("{minute} {hour} {} * *", d.day())
        } else {
            format!("{minute} {hour} {} {} *", d.day(), d.month())
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}
