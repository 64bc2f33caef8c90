use super::error::Result;
use super::validation::{optional, required};
use serde::{Deserialize, Serialize};

/// Specialties offered by the doctor form. Any other non-blank value is accepted too.
pub const SPECIALTIES: [&str; 8] = [
    "Cardiology",
    "Dermatology",
    "Neurology",
    "Orthopedics",
    "Pediatrics",
    "Psychiatry",
    "General Medicine",
    "Gynecology",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i32,
    pub full_name: String,
    pub specialty: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Doctor {
    /// Everything before the first space of the full name.
    pub fn first_name(&self) -> &str {
        split_name(&self.full_name).0
    }

    /// Everything after the first space of the full name, or empty.
    pub fn last_name(&self) -> &str {
        split_name(&self.full_name).1
    }
}

fn split_name(full_name: &str) -> (&str, &str) {
    match full_name.split_once(' ') {
        Some((first, last)) => (first, last),
        None => (full_name, ""),
    }
}

/// Field values captured by the add/edit doctor form.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorForm {
    pub full_name: String,
    pub specialty: String,
    pub available: bool,
    pub phone: Option<String>,
}

impl DoctorForm {
    pub fn new(full_name: &str, specialty: &str, available: bool) -> Self {
        DoctorForm {
            full_name: full_name.to_string(),
            specialty: specialty.to_string(),
            available,
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    /// Trims every field and rejects a blank name or specialty.
    pub fn validated(self) -> Result<Self> {
        Ok(DoctorForm {
            full_name: required("doctor's full name", &self.full_name)?,
            specialty: required("specialty", &self.specialty)?,
            available: self.available,
            phone: self.phone.as_deref().and_then(optional),
        })
    }
}

impl From<&Doctor> for DoctorForm {
    fn from(doctor: &Doctor) -> Self {
        DoctorForm {
            full_name: doctor.full_name.clone(),
            specialty: doctor.specialty.clone(),
            available: doctor.available,
            phone: doctor.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(full_name: &str) -> Doctor {
        Doctor {
            id: 1,
            full_name: full_name.to_string(),
            specialty: "Neurology".to_string(),
            available: true,
            phone: None,
        }
    }

    #[test]
    fn test_name_split_at_first_space() {
        let d = doctor("Maria Elena Santos");
        assert_eq!(d.first_name(), "Maria");
        assert_eq!(d.last_name(), "Elena Santos");
    }

    #[test]
    fn test_name_without_space() {
        let d = doctor("Hippocrates");
        assert_eq!(d.first_name(), "Hippocrates");
        assert_eq!(d.last_name(), "");
    }

    #[test]
    fn test_form_validation_trims_and_drops_blank_phone() {
        let form = DoctorForm::new("  Dr. X ", " Oncology", true).with_phone("   ").validated().unwrap();
        assert_eq!(form.full_name, "Dr. X");
        assert_eq!(form.specialty, "Oncology");
        assert_eq!(form.phone, None);
    }

    #[test]
    fn test_form_validation_rejects_blank_specialty() {
        let err = DoctorForm::new("Dr. X", "  ", true).validated().unwrap_err();
        assert!(err.is_user_error());
        assert!(err.to_string().contains("specialty"));
    }
}
