use super::error::Result;
use super::validation::{not_before, optional, selected};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Stored appointment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i32,
    pub doctor_id: i32,
    pub patient_id: i32,
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Appointment joined with its doctor and patient for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: i32,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
    pub doctor_name: String,
    pub specialty: String,
    pub patient_name: String,
    pub patient_email: String,
    pub doctor_id: i32,
    pub patient_id: i32,
}

impl AppointmentView {
    /// Case-insensitive substring match on patient name, doctor name, and notes.
    /// An empty query matches every row.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.patient_name.to_lowercase().contains(&query)
            || self.doctor_name.to_lowercase().contains(&query)
            || self.notes.as_deref().unwrap_or("").to_lowercase().contains(&query)
    }
}

/// Narrows a listing the way the appointment search box does.
pub fn search(views: Vec<AppointmentView>, query: &str) -> Vec<AppointmentView> {
    views.into_iter().filter(|view| view.matches(query)).collect()
}

/// Validated booking or update values.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentForm {
    pub doctor_id: i32,
    pub patient_id: i32,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
}

impl AppointmentForm {
    pub fn new(doctor_id: i32, patient_id: i32, date: NaiveDateTime, notes: &str) -> Self {
        AppointmentForm {
            doctor_id,
            patient_id,
            date,
            notes: optional(notes),
        }
    }

    /// Builds a form from raw selections, rejecting missing choices and past dates.
    pub fn from_input(doctor_id: Option<i32>, patient_id: Option<i32>, date: NaiveDateTime, notes: &str, today: NaiveDate) -> Result<Self> {
        let doctor_id = selected("doctor", doctor_id)?;
        let patient_id = selected("patient", patient_id)?;
        let date = not_before(date, today)?;

        Ok(AppointmentForm::new(doctor_id, patient_id, date, notes))
    }
}

impl From<&AppointmentView> for AppointmentForm {
    fn from(view: &AppointmentView) -> Self {
        AppointmentForm {
            doctor_id: view.doctor_id,
            patient_id: view.patient_id,
            date: view.date,
            notes: view.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(patient_name: &str, doctor_name: &str, notes: Option<&str>) -> AppointmentView {
        AppointmentView {
            id: 1,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            notes: notes.map(str::to_string),
            doctor_name: doctor_name.to_string(),
            specialty: "Cardiology".to_string(),
            patient_name: patient_name.to_string(),
            patient_email: "x@example.com".to_string(),
            doctor_id: 1,
            patient_id: 1,
        }
    }

    #[test]
    fn test_search_matches_any_column_case_insensitively() {
        let rows = vec![
            view("Alice Moore", "Dr. John Smith", None),
            view("Bob Stone", "Dr. Emily Chen", Some("Follow-up on MRI")),
            view("Carol White", "Dr. Emily Chen", Some("first visit")),
        ];

        assert_eq!(search(rows.clone(), "ALICE").len(), 1);
        assert_eq!(search(rows.clone(), "chen").len(), 2);
        assert_eq!(search(rows.clone(), "mri").len(), 1);
        assert_eq!(search(rows.clone(), "").len(), 3);
        assert!(search(rows, "nobody").is_empty());
    }

    #[test]
    fn test_from_input_requires_selections() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let date = today.and_hms_opt(9, 30, 0).unwrap();

        assert!(AppointmentForm::from_input(None, Some(1), date, "", today).is_err());
        assert!(AppointmentForm::from_input(Some(1), None, date, "", today).is_err());

        let form = AppointmentForm::from_input(Some(2), Some(3), date, "  ", today).unwrap();
        assert_eq!(form.doctor_id, 2);
        assert_eq!(form.patient_id, 3);
        assert_eq!(form.notes, None);
    }
}
