use super::error::Result;
use super::validation::required;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i32,
    pub full_name: String,
    pub email: String,
}

/// Field values captured by the add/edit patient form.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientForm {
    pub full_name: String,
    pub email: String,
}

impl PatientForm {
    pub fn new(full_name: &str, email: &str) -> Self {
        PatientForm {
            full_name: full_name.to_string(),
            email: email.to_string(),
        }
    }

    pub fn validated(self) -> Result<Self> {
        Ok(PatientForm {
            full_name: required("patient's full name", &self.full_name)?,
            email: required("patient's email", &self.email)?,
        })
    }
}

impl From<&Patient> for PatientForm {
    fn from(patient: &Patient) -> Self {
        PatientForm::new(&patient.full_name, &patient.email)
    }
}
