//! Cron schedule validation.
//!
//! Schedules are validated and kept as text; nothing is compiled or stored in
//! parsed form.

use std::str::FromStr;

use crate::{Codec, CodecError, CodecResult};

const TYPE_NAME: &str = "cron expression";

/// Named shortcuts accepted in place of the six fields.
const DESCRIPTORS: &[&str] = &[
    "yearly", "annually", "monthly", "weekly", "daily", "midnight", "hourly",
];

/// Cron expression with a seconds field: `sec min hour day-of-month month
/// day-of-week`, or a descriptor such as `@daily` or `@every 1h 30m`.
///
/// Day-of-week accepts `0-6` (Sunday is 0) or `SUN`-`SAT`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CronSchedule;

impl CronSchedule {
    fn validate(expr: &str) -> Result<(), String> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err("expression is empty".into());
        }

        if let Some(descriptor) = expr.strip_prefix('@') {
            if let Some(interval) = descriptor.strip_prefix("every") {
                let interval = interval.trim();
                if interval.is_empty() {
                    return Err("`@every` requires a duration".into());
                }
                return humantime::parse_duration(interval)
                    .map(|_| ())
                    .map_err(|err| format!("invalid `@every` duration: {err}"));
            }
            if DESCRIPTORS.contains(&descriptor) {
                return Ok(());
            }
            return Err(format!("unrecognized descriptor `@{descriptor}`"));
        }

        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(format!("expected 6 fields, found {}", fields.len()));
        }

        let day_of_week = shift_day_of_week(fields[5])?;
        let normalized = format!("{} {day_of_week}", fields[..5].join(" "));
        ::cron::Schedule::from_str(&normalized)
            .map(|_| ())
            .map_err(|err| err.to_string())
    }
}

/// Rewrites numeric day-of-week values from `0-6` (Sunday = 0) to the `1-7`
/// numbering the `cron` crate expects. Names, wildcards and step values pass
/// through unchanged.
fn shift_day_of_week(field: &str) -> Result<String, String> {
    let mut items = Vec::new();
    for item in field.split(',') {
        let (range, step) = match item.split_once('/') {
            Some((range, step)) => (range, Some(step)),
            None => (item, None),
        };
        let mut bounds = Vec::new();
        for bound in range.split('-') {
            if !bound.is_empty() && bound.bytes().all(|b| b.is_ascii_digit()) {
                match bound.parse::<u8>() {
                    Ok(day @ 0..=6) => bounds.push((day + 1).to_string()),
                    _ => return Err(format!("day-of-week `{bound}` out of range 0-6")),
                }
            } else {
                bounds.push(bound.to_owned());
            }
        }
        let mut shifted = bounds.join("-");
        if let Some(step) = step {
            shifted.push('/');
            shifted.push_str(step);
        }
        items.push(shifted);
    }
    Ok(items.join(","))
}

impl Codec for CronSchedule {
    type Value = String;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn parse(&self, input: &str) -> CodecResult<String> {
        Self::validate(input)
            .map(|()| input.to_owned())
            .map_err(|reason| CodecError::validation(input, TYPE_NAME, reason))
    }

    fn format(&self, value: &String) -> String {
        value.clone()
    }
}
