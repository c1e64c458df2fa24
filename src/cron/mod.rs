//! Expressions cron (5 ou 6 champs) et itération bornée sur une fenêtre.
//!
//! Les champs horaires sont lus dans le fuseau passé à l'itérateur, pas en UTC.

mod iter;
mod parser;
mod types;

pub use iter::CronIter;
pub use types::{CronError, Field};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;
use types::FieldSet;

/// Expression cron analysée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpr {
    source: String,
    seconds: FieldSet,
    minutes: FieldSet,
    hours: FieldSet,
    days_of_month: FieldSet,
    months: FieldSet,
    days_of_week: FieldSet,
}

impl CronExpr {
    pub fn parse(raw: &str) -> Result<Self, CronError> {
        parser::parse(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Itère les instants de `[start, end)` qui correspondent, dans `tz`.
    pub fn iter_between(&self, tz: Tz, start: DateTime<Utc>, end: DateTime<Utc>) -> CronIter<'_> {
        CronIter::new(self, tz, start, end)
    }

    /// Jour du mois et jour de semaine tous deux restreints : l'un OU l'autre suffit.
    pub(crate) fn matches_day(&self, date: NaiveDate) -> bool {
        let dom = self.days_of_month.contains(date.day());
        let dow = self.days_of_week.contains(date.weekday().num_days_from_sunday());
        if self.days_of_month.is_wildcard() || self.days_of_week.is_wildcard() {
            dom && dow
        } else {
            dom || dow
        }
    }
}

impl FromStr for CronExpr {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
