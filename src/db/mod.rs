//! Data-access layer for the clinic desk.
//!
//! Every storage backend implements [`ClinicStore`], so the forms work the same
//! whether records live in SQL Server, a local SQLite file, or three JSON files.
//!
//! ## Backends
//!
//! - **SQLite** ([`sqlite::SqliteStore`]): versioned schema via [`migrations`],
//!   foreign keys enforced, mutations in local transactions.
//! - **SQL Server** ([`mssql::MssqlStore`]): ADO connection string, one
//!   connection per operation, multi-statement mutations inside
//!   `BEGIN TRANSACTION` with `XACT_ABORT`.
//! - **Flat files** ([`files::FileStore`]): owned in-memory collections saved
//!   to disk after every mutation; no foreign keys, no transactions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use medapp::db::{self, ClinicStore};
//! use medapp::libs::config::Config;
//! use medapp::libs::doctor::DoctorForm;
//!
//! let mut store = db::open(&Config::read()?)?;
//! let id = store.add_doctor(&DoctorForm::new("Dr. X", "Oncology", true))?;
//! let rows = store.appointments_by_doctor(id)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod files;
pub mod migrations;
pub mod mssql;
pub mod seed;
pub mod sqlite;

use crate::libs::appointment::{AppointmentForm, AppointmentView};
use crate::libs::config::{BackendConfig, Config};
use crate::libs::data_storage::DataStorage;
use crate::libs::doctor::{Doctor, DoctorForm};
use crate::libs::error::{ClinicError, Result};
use crate::libs::patient::{Patient, PatientForm};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What to do with appointments when their doctor or patient is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse the delete while appointments reference the record.
    Block,
    /// Delete the referencing appointments first, then the record.
    Cascade,
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletePolicy::Block => write!(f, "block"),
            DeletePolicy::Cascade => write!(f, "cascade"),
        }
    }
}

/// Result of deleting a doctor or patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Record removed, along with `cascaded` appointments.
    Deleted { cascaded: usize },
    /// Record kept because `appointments` appointments still reference it.
    Blocked { appointments: usize },
    /// No record with that ID.
    NotFound,
}

impl DeleteOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted { .. })
    }

    /// Converts a failed outcome into the matching error.
    pub fn into_result(self, entity: &'static str, id: i32) -> Result<usize> {
        match self {
            DeleteOutcome::Deleted { cascaded } => Ok(cascaded),
            DeleteOutcome::Blocked { appointments } => Err(ClinicError::HasAppointments { entity, id, appointments }),
            DeleteOutcome::NotFound => Err(ClinicError::not_found(entity, id)),
        }
    }
}

/// Operations every storage backend provides.
///
/// Lists of doctors and patients are ordered by ID; appointment listings are
/// joined with doctor and patient and ordered by date, newest first.
pub trait ClinicStore {
    /// Short backend name for messages and logs.
    fn backend_name(&self) -> &'static str;

    fn delete_policy(&self) -> DeletePolicy;

    // Doctors
    fn doctors(&mut self) -> Result<Vec<Doctor>>;
    fn available_doctors(&mut self) -> Result<Vec<Doctor>>;
    fn doctor(&mut self, id: i32) -> Result<Option<Doctor>>;
    fn add_doctor(&mut self, form: &DoctorForm) -> Result<i32>;
    fn update_doctor(&mut self, id: i32, form: &DoctorForm) -> Result<bool>;
    fn set_doctor_availability(&mut self, id: i32, available: bool) -> Result<bool>;
    fn delete_doctor(&mut self, id: i32) -> Result<DeleteOutcome>;

    // Patients
    fn patients(&mut self) -> Result<Vec<Patient>>;
    fn patient(&mut self, id: i32) -> Result<Option<Patient>>;
    fn add_patient(&mut self, form: &PatientForm) -> Result<i32>;
    fn update_patient(&mut self, id: i32, form: &PatientForm) -> Result<bool>;
    fn delete_patient(&mut self, id: i32) -> Result<DeleteOutcome>;

    // Appointments
    fn appointments(&mut self) -> Result<Vec<AppointmentView>>;
    fn appointments_by_doctor(&mut self, doctor_id: i32) -> Result<Vec<AppointmentView>>;
    fn appointments_by_patient(&mut self, patient_id: i32) -> Result<Vec<AppointmentView>>;
    fn appointment(&mut self, id: i32) -> Result<Option<AppointmentView>>;
    fn book_appointment(&mut self, form: &AppointmentForm) -> Result<i32>;
    fn update_appointment(&mut self, id: i32, form: &AppointmentForm) -> Result<bool>;
    fn delete_appointment(&mut self, id: i32) -> Result<bool>;
}

/// Database file of the embedded backend, `None` for the other backends.
pub fn sqlite_path(config: &Config, storage: &DataStorage) -> Result<Option<PathBuf>> {
    match &config.backend {
        BackendConfig::Sqlite { path: Some(path) } => Ok(Some(path.clone())),
        BackendConfig::Sqlite { path: None } => Ok(Some(storage.get_path(sqlite::DB_FILE_NAME)?)),
        _ => Ok(None),
    }
}

/// Opens the store selected by the configuration.
///
/// Backends without an explicit location keep their files in the platform
/// data directory.
pub fn open(config: &Config) -> Result<Box<dyn ClinicStore>> {
    open_in(config, &DataStorage::new())
}

/// Like [`open`], with the data directory given explicitly.
pub fn open_in(config: &Config, storage: &DataStorage) -> Result<Box<dyn ClinicStore>> {
    let policy = config.delete_policy;
    let store: Box<dyn ClinicStore> = match &config.backend {
        BackendConfig::Sqlite { .. } => {
            let path = sqlite_path(config, storage)?.ok_or_else(|| ClinicError::Config("sqlite backend without a path".to_string()))?;
            let store = sqlite::SqliteStore::open(&path)?;
            Box::new(match policy {
                Some(policy) => store.with_delete_policy(policy),
                None => store,
            })
        }
        BackendConfig::Mssql { .. } => {
            let connection_string = config
                .connection_string()
                .ok_or_else(|| ClinicError::Config("no SQL Server connection string configured".to_string()))?;
            let store = mssql::MssqlStore::open(&connection_string)?;
            Box::new(match policy {
                Some(policy) => store.with_delete_policy(policy),
                None => store,
            })
        }
        BackendConfig::Files { dir } => {
            let dir = match dir {
                Some(dir) => dir.clone(),
                None => storage.get_path(files::DATA_DIR_NAME)?,
            };
            let store = files::FileStore::open(&dir)?;
            Box::new(match policy {
                Some(policy) => store.with_delete_policy(policy),
                None => store,
            })
        }
    };

    tracing::debug!(backend = store.backend_name(), policy = %store.delete_policy(), "store opened");
    Ok(store)
}
