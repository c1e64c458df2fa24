use std::fmt;
use thiserror::Error;

/// Champ d'une expression cron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl Field {
    /// Bornes inclusives acceptées à l'analyse (`7` = dimanche pour le jour de semaine).
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Field::Second | Field::Minute => (0, 59),
            Field::Hour => (0, 23),
            Field::DayOfMonth => (1, 31),
            Field::Month => (1, 12),
            Field::DayOfWeek => (0, 7),
        }
    }

    pub fn is_day(self) -> bool {
        matches!(self, Field::DayOfMonth | Field::DayOfWeek)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Second => "second",
            Field::Minute => "minute",
            Field::Hour => "hour",
            Field::DayOfMonth => "day-of-month",
            Field::Month => "month",
            Field::DayOfWeek => "day-of-week",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    #[error("empty cron expression")]
    Empty,
    #[error("expected 5 or 6 fields, found {0}")]
    FieldCount(usize),
    #[error("unknown macro: {0}")]
    UnknownMacro(String),
    #[error("empty {0} field")]
    EmptyField(Field),
    #[error("invalid {field} value: {raw}")]
    InvalidValue { field: Field, raw: String },
    #[error("{field} value {value} out of range {min}-{max}")]
    OutOfRange {
        field: Field,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("invalid {field} range: {start}-{end}")]
    InvalidRange { field: Field, start: u32, end: u32 },
    #[error("{0} step must be greater than zero")]
    ZeroStep(Field),
    #[error("'?' only allowed in day fields, found in {0}")]
    MisplacedQuestionMark(Field),
}

/// Ensemble des valeurs autorisées pour un champ (bit `n` = valeur `n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldSet {
    bits: u64,
    wildcard: bool,
}

impl FieldSet {
    pub(crate) fn empty() -> Self {
        Self {
            bits: 0,
            wildcard: false,
        }
    }

    pub(crate) fn full(field: Field) -> Self {
        let (min, max) = field.bounds();
        let mut set = Self::empty();
        for v in min..=max {
            set.insert(v);
        }
        set.wildcard = true;
        set
    }

    pub(crate) fn insert(&mut self, value: u32) {
        self.bits |= 1u64 << value;
    }

    pub(crate) fn contains(&self, value: u32) -> bool {
        value < 64 && self.bits & (1u64 << value) != 0
    }

    /// Plus petite valeur autorisée `>= from`.
    pub(crate) fn next_from(&self, from: u32) -> Option<u32> {
        if from >= 64 {
            return None;
        }
        let masked = self.bits & (u64::MAX << from);
        (masked != 0).then(|| masked.trailing_zeros())
    }

    pub(crate) fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Replie le 7 sur le 0 (dimanche).
    pub(crate) fn fold_sunday(&mut self) {
        if self.contains(7) {
            self.bits &= !(1u64 << 7);
            self.insert(0);
        }
    }
}
