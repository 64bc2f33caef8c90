//! Flat-file store: three JSON documents in one directory.
//!
//! The store owns its collections in memory. Every mutation is applied to a
//! copy of the affected collection, which replaces the live one only after its
//! file was written. There is no transaction spanning files: if a
//! cascading delete fails after `appointments.json` was written, the doctor or
//! patient file may still hold the old record. References from appointments to
//! doctors and patients are not checked; joined listings simply skip
//! appointments whose doctor or patient is gone.
//!
//! Each file stores a high-water mark next to its rows, so identifiers stay
//! unique even after the newest record is deleted.

use super::{seed, ClinicStore, DeleteOutcome, DeletePolicy};
use crate::libs::appointment::{Appointment, AppointmentForm, AppointmentView};
use crate::libs::doctor::{Doctor, DoctorForm};
use crate::libs::error::Result;
use crate::libs::patient::{Patient, PatientForm};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_NAME: &str = "data";
pub const DOCTORS_FILE_NAME: &str = "doctors.json";
pub const PATIENTS_FILE_NAME: &str = "patients.json";
pub const APPOINTMENTS_FILE_NAME: &str = "appointments.json";

/// Anything stored in a collection file.
pub trait Record {
    fn id(&self) -> i32;
}

impl Record for Doctor {
    fn id(&self) -> i32 {
        self.id
    }
}

impl Record for Patient {
    fn id(&self) -> i32 {
        self.id
    }
}

impl Record for Appointment {
    fn id(&self) -> i32 {
        self.id
    }
}

/// On-disk layout of one collection file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    /// Highest identifier ever assigned in this collection.
    #[serde(default)]
    pub last_id: i32,
    pub rows: Vec<T>,
}

impl<T: Record> Collection<T> {
    fn new(rows: Vec<T>) -> Self {
        let last_id = rows.iter().map(Record::id).max().unwrap_or(0);
        Collection { last_id, rows }
    }

    /// Max-plus-one over both the stored mark and the rows actually present.
    fn next_id(&mut self) -> i32 {
        let max_row = self.rows.iter().map(Record::id).max().unwrap_or(0);
        self.last_id = self.last_id.max(max_row) + 1;
        self.last_id
    }

    fn find(&self, id: i32) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    fn find_mut(&mut self, id: i32) -> Option<&mut T> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    fn remove(&mut self, id: i32) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }
}

pub struct FileStore {
    dir: PathBuf,
    doctors: Collection<Doctor>,
    patients: Collection<Patient>,
    appointments: Collection<Appointment>,
    policy: DeletePolicy,
}

impl FileStore {
    /// Cascading deletes unless configured otherwise.
    pub const DEFAULT_DELETE_POLICY: DeletePolicy = DeletePolicy::Cascade;

    /// Loads the three files from `dir`, creating the directory and seeding any
    /// missing file.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;

        let doctors = load_or_create(&dir.join(DOCTORS_FILE_NAME), seed::doctors)?;
        let patients = load_or_create(&dir.join(PATIENTS_FILE_NAME), seed::patients)?;
        let appointments = load_or_create(&dir.join(APPOINTMENTS_FILE_NAME), Vec::new)?;

        tracing::debug!(
            dir = %dir.display(),
            doctors = doctors.rows.len(),
            patients = patients.rows.len(),
            appointments = appointments.rows.len(),
            "file store loaded"
        );

        Ok(FileStore {
            dir: dir.to_path_buf(),
            doctors,
            patients,
            appointments,
            policy: Self::DEFAULT_DELETE_POLICY,
        })
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn change_doctors<R>(&mut self, change: impl FnOnce(&mut Collection<Doctor>) -> R) -> Result<R> {
        commit(&self.dir.join(DOCTORS_FILE_NAME), &mut self.doctors, change)
    }

    fn change_patients<R>(&mut self, change: impl FnOnce(&mut Collection<Patient>) -> R) -> Result<R> {
        commit(&self.dir.join(PATIENTS_FILE_NAME), &mut self.patients, change)
    }

    fn change_appointments<R>(&mut self, change: impl FnOnce(&mut Collection<Appointment>) -> R) -> Result<R> {
        commit(&self.dir.join(APPOINTMENTS_FILE_NAME), &mut self.appointments, change)
    }

    fn view(&self, appointment: &Appointment) -> Option<AppointmentView> {
        let doctor = self.doctors.find(appointment.doctor_id)?;
        let patient = self.patients.find(appointment.patient_id)?;

        Some(AppointmentView {
            id: appointment.id,
            date: appointment.date,
            notes: appointment.notes.clone(),
            doctor_name: doctor.full_name.clone(),
            specialty: doctor.specialty.clone(),
            patient_name: patient.full_name.clone(),
            patient_email: patient.email.clone(),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
        })
    }

    fn views<F>(&self, filter: F) -> Vec<AppointmentView>
    where
        F: Fn(&Appointment) -> bool,
    {
        let mut views: Vec<AppointmentView> = self
            .appointments
            .rows
            .iter()
            .filter(|a| filter(*a))
            .filter_map(|a| self.view(a))
            .collect();
        views.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        views
    }

    /// Applies the delete policy to the appointments matching `depends`.
    /// Returns `Err(count)` when the policy blocks the delete.
    fn release_dependents<F>(&mut self, depends: F) -> Result<std::result::Result<usize, usize>>
    where
        F: Fn(&Appointment) -> bool,
    {
        let dependents = self.appointments.rows.iter().filter(|a| depends(*a)).count();
        if dependents == 0 {
            return Ok(Ok(0));
        }

        match self.policy {
            DeletePolicy::Block => Ok(Err(dependents)),
            DeletePolicy::Cascade => {
                self.change_appointments(|appointments| appointments.rows.retain(|a| !depends(a)))?;
                Ok(Ok(dependents))
            }
        }
    }
}

fn load_or_create<T, F>(path: &Path, seed: F) -> Result<Collection<T>>
where
    T: Record + Serialize + DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let collection: Collection<T> = serde_json::from_str(&content).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "corrupt data file");
            e
        })?;
        return Ok(collection);
    }

    let collection = Collection::new(seed());
    save(path, &collection)?;
    Ok(collection)
}

/// Writes a changed copy of `collection` and swaps it in once the file is saved,
/// so a failed write leaves the in-memory state untouched.
fn commit<T, R>(path: &Path, collection: &mut Collection<T>, change: impl FnOnce(&mut Collection<T>) -> R) -> Result<R>
where
    T: Clone + Serialize,
{
    let mut candidate = collection.clone();
    let result = change(&mut candidate);
    save(path, &candidate)?;
    *collection = candidate;

    Ok(result)
}

fn save<T: Serialize>(path: &Path, collection: &Collection<T>) -> Result<()> {
    let json = serde_json::to_string_pretty(collection)?;
    fs::write(path, json).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "error saving data file");
        e
    })?;
    Ok(())
}

impl ClinicStore for FileStore {
    fn backend_name(&self) -> &'static str {
        "files"
    }

    fn delete_policy(&self) -> DeletePolicy {
        self.policy
    }

    fn doctors(&mut self) -> Result<Vec<Doctor>> {
        let mut doctors = self.doctors.rows.clone();
        doctors.sort_by_key(|d| d.id);
        Ok(doctors)
    }

    fn available_doctors(&mut self) -> Result<Vec<Doctor>> {
        Ok(self.doctors()?.into_iter().filter(|d| d.available).collect())
    }

    fn doctor(&mut self, id: i32) -> Result<Option<Doctor>> {
        Ok(self.doctors.find(id).cloned())
    }

    fn add_doctor(&mut self, form: &DoctorForm) -> Result<i32> {
        self.change_doctors(|doctors| {
            let id = doctors.next_id();
            doctors.rows.push(Doctor {
                id,
                full_name: form.full_name.clone(),
                specialty: form.specialty.clone(),
                available: form.available,
                phone: form.phone.clone(),
            });
            id
        })
    }

    fn update_doctor(&mut self, id: i32, form: &DoctorForm) -> Result<bool> {
        if self.doctors.find(id).is_none() {
            return Ok(false);
        }

        self.change_doctors(|doctors| {
            if let Some(doctor) = doctors.find_mut(id) {
                doctor.full_name = form.full_name.clone();
                doctor.specialty = form.specialty.clone();
                doctor.available = form.available;
                doctor.phone = form.phone.clone();
            }
        })?;

        Ok(true)
    }

    fn set_doctor_availability(&mut self, id: i32, available: bool) -> Result<bool> {
        if self.doctors.find(id).is_none() {
            return Ok(false);
        }

        self.change_doctors(|doctors| {
            if let Some(doctor) = doctors.find_mut(id) {
                doctor.available = available;
            }
        })?;

        Ok(true)
    }

    fn delete_doctor(&mut self, id: i32) -> Result<DeleteOutcome> {
        if self.doctors.find(id).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        let cascaded = match self.release_dependents(|a| a.doctor_id == id)? {
            Ok(cascaded) => cascaded,
            Err(appointments) => return Ok(DeleteOutcome::Blocked { appointments }),
        };

        self.change_doctors(|doctors| doctors.remove(id))?;

        Ok(DeleteOutcome::Deleted { cascaded })
    }

    fn patients(&mut self) -> Result<Vec<Patient>> {
        let mut patients = self.patients.rows.clone();
        patients.sort_by_key(|p| p.id);
        Ok(patients)
    }

    fn patient(&mut self, id: i32) -> Result<Option<Patient>> {
        Ok(self.patients.find(id).cloned())
    }

    fn add_patient(&mut self, form: &PatientForm) -> Result<i32> {
        self.change_patients(|patients| {
            let id = patients.next_id();
            patients.rows.push(Patient {
                id,
                full_name: form.full_name.clone(),
                email: form.email.clone(),
            });
            id
        })
    }

    fn update_patient(&mut self, id: i32, form: &PatientForm) -> Result<bool> {
        if self.patients.find(id).is_none() {
            return Ok(false);
        }

        self.change_patients(|patients| {
            if let Some(patient) = patients.find_mut(id) {
                patient.full_name = form.full_name.clone();
                patient.email = form.email.clone();
            }
        })?;

        Ok(true)
    }

    fn delete_patient(&mut self, id: i32) -> Result<DeleteOutcome> {
        if self.patients.find(id).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        let cascaded = match self.release_dependents(|a| a.patient_id == id)? {
            Ok(cascaded) => cascaded,
            Err(appointments) => return Ok(DeleteOutcome::Blocked { appointments }),
        };

        self.change_patients(|patients| patients.remove(id))?;

        Ok(DeleteOutcome::Deleted { cascaded })
    }

    fn appointments(&mut self) -> Result<Vec<AppointmentView>> {
        Ok(self.views(|_| true))
    }

    fn appointments_by_doctor(&mut self, doctor_id: i32) -> Result<Vec<AppointmentView>> {
        Ok(self.views(|a| a.doctor_id == doctor_id))
    }

    fn appointments_by_patient(&mut self, patient_id: i32) -> Result<Vec<AppointmentView>> {
        Ok(self.views(|a| a.patient_id == patient_id))
    }

    fn appointment(&mut self, id: i32) -> Result<Option<AppointmentView>> {
        Ok(self.appointments.find(id).and_then(|a| self.view(a)))
    }

    fn book_appointment(&mut self, form: &AppointmentForm) -> Result<i32> {
        self.change_appointments(|appointments| {
            let id = appointments.next_id();
            appointments.rows.push(Appointment {
                id,
                doctor_id: form.doctor_id,
                patient_id: form.patient_id,
                date: form.date,
                notes: form.notes.clone(),
            });
            id
        })
    }

    fn update_appointment(&mut self, id: i32, form: &AppointmentForm) -> Result<bool> {
        if self.appointments.find(id).is_none() {
            return Ok(false);
        }

        self.change_appointments(|appointments| {
            if let Some(appointment) = appointments.find_mut(id) {
                appointment.doctor_id = form.doctor_id;
                appointment.patient_id = form.patient_id;
                appointment.date = form.date;
                appointment.notes = form.notes.clone();
            }
        })?;

        Ok(true)
    }

    fn delete_appointment(&mut self, id: i32) -> Result<bool> {
        if self.appointments.find(id).is_none() {
            return Ok(false);
        }

        self.change_appointments(|appointments| appointments.remove(id))
    }
}
