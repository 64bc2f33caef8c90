//! Embedded single-file store on SQLite.
//!
//! Foreign keys are enforced, so an appointment can only be booked for an
//! existing doctor and patient. Deletes that touch more than one table run in
//! one transaction; dropping an uncommitted `Transaction` rolls it back.

use super::db::Db;
use super::{ClinicStore, DeleteOutcome, DeletePolicy};
use crate::libs::appointment::{AppointmentForm, AppointmentView};
use crate::libs::doctor::{Doctor, DoctorForm};
use crate::libs::error::Result;
use crate::libs::patient::{Patient, PatientForm};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

pub const DB_FILE_NAME: &str = "medapp.db";

const SELECT_DOCTORS: &str = "SELECT id, full_name, specialty, available, phone FROM doctors";
const INSERT_DOCTOR: &str = "INSERT INTO doctors (full_name, specialty, available, phone) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_DOCTOR: &str = "UPDATE doctors SET full_name = ?2, specialty = ?3, available = ?4, phone = ?5 WHERE id = ?1";
const UPDATE_DOCTOR_AVAILABILITY: &str = "UPDATE doctors SET available = ?2 WHERE id = ?1";
const DELETE_DOCTOR: &str = "DELETE FROM doctors WHERE id = ?1";

const SELECT_PATIENTS: &str = "SELECT id, full_name, email FROM patients";
const INSERT_PATIENT: &str = "INSERT INTO patients (full_name, email) VALUES (?1, ?2)";
const UPDATE_PATIENT: &str = "UPDATE patients SET full_name = ?2, email = ?3 WHERE id = ?1";
const DELETE_PATIENT: &str = "DELETE FROM patients WHERE id = ?1";

const SELECT_APPOINTMENT_VIEWS: &str = "SELECT a.id, a.date, a.notes,
        d.full_name AS doctor_name, d.specialty,
        p.full_name AS patient_name, p.email AS patient_email,
        a.doctor_id, a.patient_id
    FROM appointments a
    INNER JOIN doctors d ON a.doctor_id = d.id
    INNER JOIN patients p ON a.patient_id = p.id";
const ORDER_BY_DATE_DESC: &str = "ORDER BY a.date DESC, a.id DESC";
const INSERT_APPOINTMENT: &str = "INSERT INTO appointments (doctor_id, patient_id, date, notes) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_APPOINTMENT: &str = "UPDATE appointments SET doctor_id = ?2, patient_id = ?3, date = ?4, notes = ?5 WHERE id = ?1";
const DELETE_APPOINTMENT: &str = "DELETE FROM appointments WHERE id = ?1";

/// Which foreign key a doctor/patient delete has to look at.
#[derive(Clone, Copy)]
enum Owner {
    Doctor,
    Patient,
}

impl Owner {
    fn entity_table(self) -> &'static str {
        match self {
            Owner::Doctor => "doctors",
            Owner::Patient => "patients",
        }
    }

    fn appointment_column(self) -> &'static str {
        match self {
            Owner::Doctor => "doctor_id",
            Owner::Patient => "patient_id",
        }
    }
}

pub struct SqliteStore {
    conn: Connection,
    policy: DeletePolicy,
}

impl SqliteStore {
    /// Cascading deletes unless configured otherwise.
    pub const DEFAULT_DELETE_POLICY: DeletePolicy = DeletePolicy::Cascade;

    pub fn open(path: &Path) -> Result<Self> {
        let db = Db::open(path)?;
        tracing::debug!(path = %path.display(), "sqlite store opened");

        Ok(SqliteStore {
            conn: db.conn,
            policy: Self::DEFAULT_DELETE_POLICY,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Db::open_in_memory()?;

        Ok(SqliteStore {
            conn: db.conn,
            policy: Self::DEFAULT_DELETE_POLICY,
        })
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn doctor_from_row(row: &Row) -> rusqlite::Result<Doctor> {
        Ok(Doctor {
            id: row.get(0)?,
            full_name: row.get(1)?,
            specialty: row.get(2)?,
            available: row.get(3)?,
            phone: row.get(4)?,
        })
    }

    fn patient_from_row(row: &Row) -> rusqlite::Result<Patient> {
        Ok(Patient {
            id: row.get(0)?,
            full_name: row.get(1)?,
            email: row.get(2)?,
        })
    }

    fn view_from_row(row: &Row) -> rusqlite::Result<AppointmentView> {
        Ok(AppointmentView {
            id: row.get(0)?,
            date: row.get(1)?,
            notes: row.get(2)?,
            doctor_name: row.get(3)?,
            specialty: row.get(4)?,
            patient_name: row.get(5)?,
            patient_email: row.get(6)?,
            doctor_id: row.get(7)?,
            patient_id: row.get(8)?,
        })
    }

    /// Runs one operation on the connection, logging failures.
    fn run<T, F>(&mut self, action: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        op(&mut self.conn).map_err(|e| {
            tracing::error!(error = %e, "error {}", action);
            e
        })
    }

    fn query_doctors(&mut self, action: &str, sql: &str) -> Result<Vec<Doctor>> {
        self.run(action, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let doctor_iter = stmt.query_map([], Self::doctor_from_row)?;

            let mut doctors = Vec::new();
            for doctor in doctor_iter {
                doctors.push(doctor?);
            }
            Ok(doctors)
        })
    }

    fn query_views(&mut self, filter: &str, id: Option<i32>) -> Result<Vec<AppointmentView>> {
        let sql = format!("{} {} {}", SELECT_APPOINTMENT_VIEWS, filter, ORDER_BY_DATE_DESC);
        self.run("getting appointments", |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let views = match id {
                Some(id) => stmt.query_map(params![id], Self::view_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
                None => stmt.query_map([], Self::view_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
            };
            Ok(views)
        })
    }

    /// Deletes a doctor or patient, applying the delete policy to its appointments.
    fn delete_owner(&mut self, owner: Owner, id: i32, delete_sql: &str) -> Result<DeleteOutcome> {
        let policy = self.policy;
        let action = format!("deleting from {}", owner.entity_table());

        self.run(&action, |conn| {
            let tx = conn.transaction()?;

            let exists: Option<i32> = tx
                .query_row(&format!("SELECT id FROM {} WHERE id = ?1", owner.entity_table()), params![id], |row| row.get(0))
                .optional()?;
            if exists.is_none() {
                return Ok(DeleteOutcome::NotFound);
            }

            let dependents: usize = tx.query_row(
                &format!("SELECT COUNT(*) FROM appointments WHERE {} = ?1", owner.appointment_column()),
                params![id],
                |row| row.get(0),
            )?;

            let cascaded = match (policy, dependents) {
                (_, 0) => 0,
                (DeletePolicy::Block, n) => return Ok(DeleteOutcome::Blocked { appointments: n }),
                (DeletePolicy::Cascade, _) => {
                    tx.execute(&format!("DELETE FROM appointments WHERE {} = ?1", owner.appointment_column()), params![id])?
                }
            };

            tx.execute(delete_sql, params![id])?;
            tx.commit()?;

            Ok(DeleteOutcome::Deleted { cascaded })
        })
    }
}

impl ClinicStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn delete_policy(&self) -> DeletePolicy {
        self.policy
    }

    fn doctors(&mut self) -> Result<Vec<Doctor>> {
        self.query_doctors("getting doctors", &format!("{} ORDER BY id", SELECT_DOCTORS))
    }

    fn available_doctors(&mut self) -> Result<Vec<Doctor>> {
        self.query_doctors("getting available doctors", &format!("{} WHERE available = 1 ORDER BY id", SELECT_DOCTORS))
    }

    fn doctor(&mut self, id: i32) -> Result<Option<Doctor>> {
        self.run("getting doctor", |conn| {
            let doctor = conn
                .query_row(&format!("{} WHERE id = ?1", SELECT_DOCTORS), params![id], Self::doctor_from_row)
                .optional()?;
            Ok(doctor)
        })
    }

    fn add_doctor(&mut self, form: &DoctorForm) -> Result<i32> {
        self.run("creating doctor", |conn| {
            conn.execute(INSERT_DOCTOR, params![form.full_name, form.specialty, form.available, form.phone])?;
            Ok(conn.last_insert_rowid() as i32)
        })
    }

    fn update_doctor(&mut self, id: i32, form: &DoctorForm) -> Result<bool> {
        self.run("updating doctor", |conn| {
            let affected = conn.execute(UPDATE_DOCTOR, params![id, form.full_name, form.specialty, form.available, form.phone])?;
            Ok(affected > 0)
        })
    }

    fn set_doctor_availability(&mut self, id: i32, available: bool) -> Result<bool> {
        self.run("updating doctor availability", |conn| {
            let affected = conn.execute(UPDATE_DOCTOR_AVAILABILITY, params![id, available])?;
            Ok(affected > 0)
        })
    }

    fn delete_doctor(&mut self, id: i32) -> Result<DeleteOutcome> {
        self.delete_owner(Owner::Doctor, id, DELETE_DOCTOR)
    }

    fn patients(&mut self) -> Result<Vec<Patient>> {
        self.run("getting patients", |conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_PATIENTS))?;
            let patient_iter = stmt.query_map([], Self::patient_from_row)?;

            let mut patients = Vec::new();
            for patient in patient_iter {
                patients.push(patient?);
            }
            Ok(patients)
        })
    }

    fn patient(&mut self, id: i32) -> Result<Option<Patient>> {
        self.run("getting patient", |conn| {
            let patient = conn
                .query_row(&format!("{} WHERE id = ?1", SELECT_PATIENTS), params![id], Self::patient_from_row)
                .optional()?;
            Ok(patient)
        })
    }

    fn add_patient(&mut self, form: &PatientForm) -> Result<i32> {
        self.run("creating patient", |conn| {
            conn.execute(INSERT_PATIENT, params![form.full_name, form.email])?;
            Ok(conn.last_insert_rowid() as i32)
        })
    }

    fn update_patient(&mut self, id: i32, form: &PatientForm) -> Result<bool> {
        self.run("updating patient", |conn| {
            let affected = conn.execute(UPDATE_PATIENT, params![id, form.full_name, form.email])?;
            Ok(affected > 0)
        })
    }

    fn delete_patient(&mut self, id: i32) -> Result<DeleteOutcome> {
        self.delete_owner(Owner::Patient, id, DELETE_PATIENT)
    }

    fn appointments(&mut self) -> Result<Vec<AppointmentView>> {
        self.query_views("", None)
    }

    fn appointments_by_doctor(&mut self, doctor_id: i32) -> Result<Vec<AppointmentView>> {
        self.query_views("WHERE a.doctor_id = ?1", Some(doctor_id))
    }

    fn appointments_by_patient(&mut self, patient_id: i32) -> Result<Vec<AppointmentView>> {
        self.query_views("WHERE a.patient_id = ?1", Some(patient_id))
    }

    fn appointment(&mut self, id: i32) -> Result<Option<AppointmentView>> {
        Ok(self.query_views("WHERE a.id = ?1", Some(id))?.into_iter().next())
    }

    fn book_appointment(&mut self, form: &AppointmentForm) -> Result<i32> {
        self.run("creating appointment", |conn| {
            conn.execute(INSERT_APPOINTMENT, params![form.doctor_id, form.patient_id, form.date, form.notes])?;
            Ok(conn.last_insert_rowid() as i32)
        })
    }

    fn update_appointment(&mut self, id: i32, form: &AppointmentForm) -> Result<bool> {
        self.run("updating appointment", |conn| {
            let affected = conn.execute(UPDATE_APPOINTMENT, params![id, form.doctor_id, form.patient_id, form.date, form.notes])?;
            Ok(affected > 0)
        })
    }

    fn delete_appointment(&mut self, id: i32) -> Result<bool> {
        self.run("deleting appointment", |conn| {
            let affected = conn.execute(DELETE_APPOINTMENT, params![id])?;
            Ok(affected > 0)
        })
    }
}
