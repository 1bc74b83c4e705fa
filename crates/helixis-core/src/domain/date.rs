use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{HelixisError, Result};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

pub fn parse_date_time(input: &str, format: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), format)
        .map_err(|_| HelixisError::InvalidDate(format.to_string()))
}

/// Calendar-free breakdown of a duration: a year is 365 days and a month 30.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl DateSpan {
    pub fn between(first: NaiveDateTime, last: NaiveDateTime) -> Result<Self> {
        if first > last {
            return Err(HelixisError::invalid(
                "The first date must be before the second date.",
            ));
        }

        let total = (last - first).num_seconds();
        let mut days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;

        let years = days / 365;
        days %= 365;
        let months = days / 30;
        days %= 30;
        let weeks = days / 7;
        days %= 7;

        Ok(Self {
            years,
            months,
            weeks,
            days,
            hours: rest / SECONDS_PER_HOUR,
            minutes: rest % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            seconds: rest % SECONDS_PER_MINUTE,
        })
    }

    fn units(&self) -> [(i64, &'static str); 7] {
        [
            (self.years, "year"),
            (self.months, "month"),
            (self.weeks, "week"),
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ]
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .units()
            .into_iter()
            .filter(|(value, _)| *value > 0)
            .map(|(value, unit)| {
                let plural = if value > 1 { "s" } else { "" };
                format!("{value} {unit}{plural}")
            })
            .collect();

        if parts.is_empty() {
            f.write_str("0 seconds")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(s: &str) -> NaiveDateTime {
        parse_date_time(s, DEFAULT_DATE_FORMAT).unwrap()
    }

    #[test]
    fn breaks_down_a_mixed_span() {
        let span = DateSpan::between(at("2023-01-01 12:00:00"), at("2024-02-03 14:30:30")).unwrap();
        assert_eq!(
            span.to_string(),
            "1 year, 1 month, 3 days, 2 hours, 30 minutes, 30 seconds"
        );
    }

    #[test]
    fn weeks_are_extracted_from_leftover_days() {
        let span = DateSpan::between(at("2024-01-01 00:00:00"), at("2024-01-10 00:00:01")).unwrap();
        assert_eq!(span.weeks, 1);
        assert_eq!(span.days, 2);
        assert_eq!(span.to_string(), "1 week, 2 days, 1 second");
    }

    #[test]
    fn identical_instants_render_as_zero_seconds() {
        let t = at("2024-05-05 05:05:05");
        assert_eq!(DateSpan::between(t, t).unwrap().to_string(), "0 seconds");
    }

    #[test]
    fn reversed_dates_are_rejected() {
        let err = DateSpan::between(at("2024-01-02 00:00:00"), at("2024-01-01 00:00:00"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The first date must be before the second date."
        );
    }

    #[test]
    fn bad_input_names_the_expected_format() {
        let err = parse_date_time("01/02/2024", DEFAULT_DATE_FORMAT).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid date format. Please use '%Y-%m-%d %H:%M:%S'."
        );
    }

    #[test]
    fn custom_formats_are_honoured() {
        let parsed = parse_date_time("03.02.2024 10:15", "%d.%m.%Y %H:%M").unwrap();
        assert_eq!(parsed, at("2024-02-03 10:15:00"));
    }
}
