//! Date/time formatting and parsing for appointment input and display.
//!
//! All appointment timestamps are local naive date-times. They are shown as
//! `YYYY-MM-DD HH:MM` and accepted in that form, as a bare `YYYY-MM-DD`
//! (start of day), or as the keywords `today` / `tomorrow` optionally
//! followed by `HH:MM`.

use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date_time(date: &NaiveDateTime) -> String {
    date.format(DATE_TIME_FORMAT).to_string()
}

/// Parses user input relative to the current local date.
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime> {
    parse_date_time_from(input, Local::now().date_naive())
}

pub fn parse_date_time_from(input: &str, today: NaiveDate) -> Result<NaiveDateTime> {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let day_part = parts.next().unwrap_or_default();
    let time_part = parts.next().map(str::trim);

    let date = match day_part.to_lowercase().as_str() {
        "today" => today,
        "tomorrow" => today + Duration::days(1),
        _ => NaiveDate::parse_from_str(day_part, DATE_FORMAT).map_err(|_| anyhow!("Invalid date '{}', expected {}", input, "YYYY-MM-DD [HH:MM]"))?,
    };

    let time = match time_part {
        Some(t) if !t.is_empty() => NaiveTime::parse_from_str(t, "%H:%M").map_err(|_| anyhow!("Invalid time '{}', expected HH:MM", t))?,
        _ => NaiveTime::MIN,
    };

    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_parse_full_timestamp() {
        let parsed = parse_date_time_from("2025-02-01 14:30", today()).unwrap();
        assert_eq!(format_date_time(&parsed), "2025-02-01 14:30");
    }

    #[test]
    fn test_parse_date_only_is_start_of_day() {
        let parsed = parse_date_time_from("2025-02-01", today()).unwrap();
        assert_eq!(format_date_time(&parsed), "2025-02-01 00:00");
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(format_date_time(&parse_date_time_from("tomorrow 09:15", today()).unwrap()), "2025-01-16 09:15");
        assert_eq!(format_date_time(&parse_date_time_from("Today", today()).unwrap()), "2025-01-15 00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date_time_from("next week", today()).is_err());
        assert!(parse_date_time_from("2025-02-01 25:99", today()).is_err());
    }
}
