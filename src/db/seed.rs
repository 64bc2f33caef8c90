//! Reference records every freshly provisioned store starts with.
//!
//! IDs run 1..=5 for both doctors and patients, so the first record added by a
//! user gets ID 6.

use crate::libs::doctor::Doctor;
use crate::libs::patient::Patient;

/// (full name, specialty, available, phone)
pub const SEED_DOCTORS: [(&str, &str, bool, Option<&str>); 5] = [
    ("Dr. John Smith", "Cardiology", true, Some("555-0101")),
    ("Dr. Emily Chen", "Dermatology", true, Some("555-0102")),
    ("Dr. Robert Johnson", "Neurology", false, None),
    ("Dr. Sarah Williams", "Pediatrics", true, Some("555-0104")),
    ("Dr. Michael Brown", "General Medicine", true, None),
];

/// (full name, email)
pub const SEED_PATIENTS: [(&str, &str); 5] = [
    ("Alice Moore", "alice.moore@example.com"),
    ("Brian Taylor", "brian.taylor@example.com"),
    ("Carol Davis", "carol.davis@example.com"),
    ("Daniel Wilson", "daniel.wilson@example.com"),
    ("Eva Martinez", "eva.martinez@example.com"),
];

pub fn doctors() -> Vec<Doctor> {
    SEED_DOCTORS
        .iter()
        .enumerate()
        .map(|(i, (full_name, specialty, available, phone))| Doctor {
            id: i as i32 + 1,
            full_name: full_name.to_string(),
            specialty: specialty.to_string(),
            available: *available,
            phone: phone.map(str::to_string),
        })
        .collect()
}

pub fn patients() -> Vec<Patient> {
    SEED_PATIENTS
        .iter()
        .enumerate()
        .map(|(i, (full_name, email))| Patient {
            id: i as i32 + 1,
            full_name: full_name.to_string(),
            email: email.to_string(),
        })
        .collect()
}
