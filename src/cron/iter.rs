use super::CronExpr;
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

/// Itérateur fini sur les instants d'une expression dans `[start, end)`.
///
/// La recherche avance sur l'heure locale de `tz`, strictement croissante.
/// Elle s'arrête au premier instant `>= end`, ou quand le curseur local
/// dépasse `limit` (motif qui ne correspond plus, ex. `0 0 30 2 *`).
#[derive(Debug, Clone)]
pub struct CronIter<'a> {
    expr: &'a CronExpr,
    tz: Tz,
    cursor: Option<NaiveDateTime>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: NaiveDateTime,
}

impl<'a> CronIter<'a> {
    pub(super) fn new(expr: &'a CronExpr, tz: Tz, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let local_end = end.with_timezone(&tz).naive_local();
        // un jour de marge couvre tout changement d'heure
        let limit = local_end
            .checked_add_signed(Duration::days(1))
            .unwrap_or(NaiveDateTime::MAX);
        let cursor = if start < end {
            ceil_to_second(start.with_timezone(&tz).naive_local())
        } else {
            None
        };
        Self {
            expr,
            tz,
            cursor,
            start,
            end,
            limit,
        }
    }
}

impl Iterator for CronIter<'_> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let from = self.cursor?;
            let Some(candidate) = self.expr.next_local_match(from, self.limit) else {
                self.cursor = None;
                return None;
            };
            self.cursor = candidate.checked_add_signed(Duration::seconds(1));

            let dt = match self.tz.from_local_datetime(&candidate) {
                LocalResult::Single(dt) => dt,
                // repli d'heure : premier passage, ou second si le premier
                // précède la fenêtre
                LocalResult::Ambiguous(earliest, latest) => {
                    if earliest.with_timezone(&Utc) < self.start {
                        latest
                    } else {
                        earliest
                    }
                }
                // trou d'heure : cette heure locale n'existe pas
                LocalResult::None => continue,
            };

            let utc = dt.with_timezone(&Utc);
            if utc >= self.end {
                self.cursor = None;
                return None;
            }
            if utc < self.start {
                continue;
            }
            return Some(dt);
        }
    }
}

impl CronExpr {
    /// Première heure locale `>= from` qui correspond, sans dépasser `limit`.
    pub(super) fn next_local_match(
        &self,
        from: NaiveDateTime,
        limit: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        let mut t = from;
        while t <= limit {
            if !self.months.contains(t.month()) {
                t = start_of_next_month(t)?;
                continue;
            }
            if !self.matches_day(t.date()) {
                t = start_of_next_day(t)?;
                continue;
            }

            match self.hours.next_from(t.hour()) {
                None => {
                    t = start_of_next_day(t)?;
                    continue;
                }
                Some(h) if h != t.hour() => {
                    t = at(t.date(), h, 0, 0)?;
                    continue;
                }
                Some(_) => {}
            }

            match self.minutes.next_from(t.minute()) {
                None => {
                    t = at(t.date(), t.hour(), 0, 0)?.checked_add_signed(Duration::hours(1))?;
                    continue;
                }
                Some(m) if m != t.minute() => {
                    t = at(t.date(), t.hour(), m, 0)?;
                    continue;
                }
                Some(_) => {}
            }

            match self.seconds.next_from(t.second()) {
                None => {
                    t = at(t.date(), t.hour(), t.minute(), 0)?
                        .checked_add_signed(Duration::minutes(1))?;
                }
                Some(s) => return at(t.date(), t.hour(), t.minute(), s),
            }
        }
        None
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32, second: u32) -> Option<NaiveDateTime> {
    date.and_hms_opt(hour, minute, second)
}

fn start_of_next_day(t: NaiveDateTime) -> Option<NaiveDateTime> {
    at(t.date().succ_opt()?, 0, 0, 0)
}

fn start_of_next_month(t: NaiveDateTime) -> Option<NaiveDateTime> {
    let (year, month) = if t.month() == 12 {
        (t.year() + 1, 1)
    } else {
        (t.year(), t.month() + 1)
    };
    at(NaiveDate::from_ymd_opt(year, month, 1)?, 0, 0, 0)
}

fn ceil_to_second(t: NaiveDateTime) -> Option<NaiveDateTime> {
    if t.nanosecond() == 0 {
        Some(t)
    } else {
        t.with_nanosecond(0)?
            .checked_add_signed(Duration::seconds(1))
    }
}
