use super::types::{CronError, Field, FieldSet};
use super::CronExpr;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

pub(super) fn parse(raw: &str) -> Result<CronExpr, CronError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CronError::Empty);
    }

    let expanded = if trimmed.starts_with('@') {
        expand_macro(trimmed)?
    } else {
        trimmed
    };

    let parts: Vec<&str> = expanded.split_whitespace().collect();
    let (second, rest) = match parts.len() {
        5 => ("0", &parts[..]),
        6 => (parts[0], &parts[1..]),
        n => return Err(CronError::FieldCount(n)),
    };

    let mut days_of_week = parse_field(rest[4], Field::DayOfWeek)?;
    days_of_week.fold_sunday();

    Ok(CronExpr {
        source: trimmed.to_string(),
        seconds: parse_field(second, Field::Second)?,
        minutes: parse_field(rest[0], Field::Minute)?,
        hours: parse_field(rest[1], Field::Hour)?,
        days_of_month: parse_field(rest[2], Field::DayOfMonth)?,
        months: parse_field(rest[3], Field::Month)?,
        days_of_week,
    })
}

fn expand_macro(raw: &str) -> Result<&'static str, CronError> {
    match raw.to_ascii_lowercase().as_str() {
        "@yearly" | "@annually" => Ok("0 0 1 1 *"),
        "@monthly" => Ok("0 0 1 * *"),
        "@weekly" => Ok("0 0 * * 0"),
        "@daily" | "@midnight" => Ok("0 0 * * *"),
        "@hourly" => Ok("0 * * * *"),
        _ => Err(CronError::UnknownMacro(raw.to_string())),
    }
}

fn parse_field(raw: &str, field: Field) -> Result<FieldSet, CronError> {
    if raw.is_empty() {
        return Err(CronError::EmptyField(field));
    }
    if raw == "*" || raw == "?" {
        if raw == "?" && !field.is_day() {
            return Err(CronError::MisplacedQuestionMark(field));
        }
        return Ok(FieldSet::full(field));
    }

    let mut set = FieldSet::empty();
    for part in raw.split(',') {
        parse_part(part, field, &mut set)?;
    }
    if set.is_empty() {
        return Err(CronError::EmptyField(field));
    }
    Ok(set)
}

/// Une composante de liste : `*`, `a`, `a-b`, suivie éventuellement de `/pas`.
fn parse_part(part: &str, field: Field, set: &mut FieldSet) -> Result<(), CronError> {
    let (min, max) = field.bounds();
    let (base, step) = match part.split_once('/') {
        Some((base, step)) => (base, Some(parse_number(step, field)?)),
        None => (part, None),
    };
    if step == Some(0) {
        return Err(CronError::ZeroStep(field));
    }

    let (start, end) = match base {
        "*" | "?" => {
            if base == "?" && !field.is_day() {
                return Err(CronError::MisplacedQuestionMark(field));
            }
            (min, max)
        }
        _ => match base.split_once('-') {
            Some((a, b)) => {
                let start = parse_value(a, field)?;
                let end = parse_value(b, field)?;
                if start > end {
                    return Err(CronError::InvalidRange { field, start, end });
                }
                (start, end)
            }
            // `a/n` court jusqu'à la borne haute du champ
            None => {
                let v = parse_value(base, field)?;
                (v, if step.is_some() { max } else { v })
            }
        },
    };

    let step = step.unwrap_or(1) as usize;
    for v in (start..=end).step_by(step) {
        set.insert(v);
    }
    Ok(())
}

fn parse_value(raw: &str, field: Field) -> Result<u32, CronError> {
    let names: &[&str] = match field {
        Field::Month => &MONTH_NAMES,
        Field::DayOfWeek => &DAY_NAMES,
        _ => &[],
    };
    if let Some(idx) = names.iter().position(|n| n.eq_ignore_ascii_case(raw)) {
        let value = if field == Field::Month { idx + 1 } else { idx };
        return Ok(value as u32);
    }

    let value = parse_number(raw, field)?;
    let (min, max) = field.bounds();
    if value < min || value > max {
        return Err(CronError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn parse_number(raw: &str, field: Field) -> Result<u32, CronError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CronError::InvalidValue {
            field,
            raw: raw.to_string(),
        });
    }
    raw.parse().map_err(|_| CronError::InvalidValue {
        field,
        raw: raw.to_string(),
    })
}
