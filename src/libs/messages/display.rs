//! Text for every [`Message`].
//!
//! Messages are plain sentences; the `msg_*!` macros add the status prefix.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled.".to_string(),
            Message::ValidationFailed(reason) => reason.clone(),
            Message::InvalidDateTime(input) => {
                format!("Cannot read '{}' as a date. Use YYYY-MM-DD, YYYY-MM-DD HH:MM, today or tomorrow.", input)
            }
            Message::StoreUnavailable(err) => format!("Cannot open the data store: {}", err),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigModuleStorage => "Storage settings".to_string(),
            Message::CurrentBackend(backend) => format!("Current backend: {}", backend),
            Message::PromptBackend => "Where should records be stored?".to_string(),
            Message::PromptSqlitePath => "SQLite database file (empty for the default location)".to_string(),
            Message::PromptConnectionString => "SQL Server connection string".to_string(),
            Message::PromptDataDir => "Data directory for the JSON files (empty for the default location)".to_string(),
            Message::PromptDeletePolicy => "When a doctor or patient with appointments is deleted".to_string(),
            Message::DeletePolicyBackendDefault => "Use the backend default".to_string(),
            Message::ConnectionStringFromEnv => "MEDAPP_CONNECTION_STRING is set and overrides the configured connection string.".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, err) => format!("Migration v{} failed: {}", version, err),
            Message::DatabaseReady => "Database schema is up to date.".to_string(),
            Message::DatabaseUpToDate => "No pending migrations.".to_string(),
            Message::DbVersion(current, latest) => format!("Database version: {} (latest: {})", current, latest),
            Message::MigrationHistoryHeader => "Applied migrations:".to_string(),
            Message::NoMigrationsApplied => "No migrations have been applied yet.".to_string(),
            Message::MigrationsNotSupported(backend) => {
                format!("The {} backend has no versioned schema; migrations apply to the sqlite backend only.", backend)
            }

            // === DOCTOR MESSAGES ===
            Message::DoctorsHeader => "Doctors:".to_string(),
            Message::AvailableDoctorsHeader => "Available doctors:".to_string(),
            Message::NoDoctorsFound => "No doctors found.".to_string(),
            Message::NoAvailableDoctors => "No doctors are currently available.".to_string(),
            Message::DoctorCreated(id) => format!("Doctor added with ID {}.", id),
            Message::DoctorUpdated(id) => format!("Doctor {} updated.", id),
            Message::DoctorNotFound(id) => format!("Doctor with ID {} not found.", id),
            Message::DoctorDeleted(id) => format!("Doctor {} deleted.", id),
            Message::DoctorDeletedWithAppointments(id, count) => {
                format!("Doctor {} deleted together with {} appointment(s).", id, count)
            }
            Message::DoctorDeleteBlocked(id, count) => {
                format!("Doctor {} has {} appointment(s). Delete those appointments first.", id, count)
            }
            Message::DoctorAvailabilityChanged(id, available) => {
                format!("Doctor {} is now {}.", id, if *available { "available" } else { "unavailable" })
            }
            Message::DoctorUnavailable(name) => format!("{} is not accepting appointments.", name),
            Message::DoctorAppointmentsHeader(name) => format!("Appointments of {}:", name),
            Message::EditingDoctor(name) => format!("Editing {}", name),
            Message::ConfirmDeleteDoctor(name) => format!("Delete {}?", name),
            Message::PromptDoctorName => "Full name".to_string(),
            Message::PromptSpecialty => "Specialty".to_string(),
            Message::PromptCustomSpecialty => "Specialty name".to_string(),
            Message::OtherSpecialty => "Other...".to_string(),
            Message::PromptPhone => "Phone number (optional)".to_string(),
            Message::PromptDoctorAvailable => "Available for appointments?".to_string(),
            Message::SelectDoctor => "Select a doctor".to_string(),
            Message::SelectDoctorAction => "Doctors".to_string(),

            // === PATIENT MESSAGES ===
            Message::PatientsHeader => "Patients:".to_string(),
            Message::NoPatientsFound => "No patients found.".to_string(),
            Message::PatientCreated(id) => format!("Patient added with ID {}.", id),
            Message::PatientUpdated(id) => format!("Patient {} updated.", id),
            Message::PatientNotFound(id) => format!("Patient with ID {} not found.", id),
            Message::PatientDeleted(id) => format!("Patient {} deleted.", id),
            Message::PatientDeletedWithAppointments(id, count) => {
                format!("Patient {} deleted together with {} appointment(s).", id, count)
            }
            Message::PatientDeleteBlocked(id, count) => {
                format!("Patient {} has {} appointment(s). Delete those appointments first.", id, count)
            }
            Message::PatientAppointmentsHeader(name) => format!("Appointments of {}:", name),
            Message::EditingPatient(name) => format!("Editing {}", name),
            Message::ConfirmDeletePatient(name) => format!("Delete {}?", name),
            Message::PromptPatientName => "Full name".to_string(),
            Message::PromptPatientEmail => "Email".to_string(),
            Message::SelectPatient => "Select a patient".to_string(),
            Message::SelectPatientAction => "Patients".to_string(),

            // === APPOINTMENT MESSAGES ===
            Message::AppointmentsHeader => "Appointments:".to_string(),
            Message::NoAppointmentsFound => "No appointments found.".to_string(),
            Message::AppointmentBooked(id) => format!("Appointment booked with ID {}.", id),
            Message::AppointmentUpdated(id) => format!("Appointment {} updated.", id),
            Message::AppointmentNotFound(id) => format!("Appointment with ID {} not found.", id),
            Message::AppointmentDeleted(id) => format!("Appointment {} deleted.", id),
            Message::AppointmentDetailsHeader(id) => format!("Appointment {}:", id),
            Message::AppointmentSearchResults(query) => format!("Appointments matching '{}':", query),
            Message::NoAppointmentsMatching(query) => format!("No appointments match '{}'.", query),
            Message::EditingAppointment(id) => format!("Editing appointment {}", id),
            Message::ConfirmDeleteAppointment(id) => format!("Delete appointment {}?", id),
            Message::PromptAppointmentDate => "Date and time (YYYY-MM-DD HH:MM)".to_string(),
            Message::PromptNotes => "Notes (optional)".to_string(),
            Message::PromptSearchQuery => "Search patient, doctor or notes".to_string(),
            Message::SelectAppointment => "Select an appointment".to_string(),
            Message::SelectAppointmentAction => "Appointments".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Exported to {}", path),
            Message::ExportNothingToExport => "Nothing to export.".to_string(),
            Message::ExportFailed(err) => format!("Export failed: {}", err),
        };

        write!(f, "{}", s)
    }
}
