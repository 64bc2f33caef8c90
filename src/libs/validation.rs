//! Input checks applied by the forms before any store is touched.
//!
//! Validation is deliberately shallow: presence of required fields, trimming,
//! and refusing appointment dates in the past. A failed check never reaches
//! the data-access layer.

use super::error::{ClinicError, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Returns the trimmed value, or a validation error naming the field.
pub fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClinicError::validation(format!("Please enter {}.", field)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value, with blank input treated as absent.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Requires a combo-box style selection to be made.
pub fn selected(field: &str, value: Option<i32>) -> Result<i32> {
    value.ok_or_else(|| ClinicError::validation(format!("Please select a {}.", field)))
}

/// Appointments may not be booked or moved to a day before `today`.
pub fn not_before(date: NaiveDateTime, today: NaiveDate) -> Result<NaiveDateTime> {
    if date.date() < today {
        return Err(ClinicError::validation(format!(
            "Appointment date {} is in the past.",
            date.format("%Y-%m-%d %H:%M")
        )));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Ann  ").unwrap(), "Ann");
    }

    #[test]
    fn test_required_rejects_whitespace() {
        let err = required("patient's email", " \t ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter patient's email.");
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(""), None);
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" call first "), Some("call first".to_string()));
    }

    #[test]
    fn test_selected() {
        assert_eq!(selected("doctor", Some(3)).unwrap(), 3);
        assert_eq!(selected("doctor", None).unwrap_err().to_string(), "Please select a doctor.");
    }

    #[test]
    fn test_not_before_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let earlier_today = today.and_hms_opt(0, 5, 0).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap().and_hms_opt(23, 59, 0).unwrap();

        assert!(not_before(earlier_today, today).is_ok());
        assert!(not_before(yesterday, today).is_err());
    }
}
