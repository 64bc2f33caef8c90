//! Relational server store on Microsoft SQL Server.
//!
//! The store keeps only the parsed connection settings and a current-thread
//! Tokio runtime; every operation opens its own connection, runs, and drops it.
//! Multi-statement mutations run between `BEGIN TRANSACTION` and `COMMIT` with
//! `XACT_ABORT` on, and are rolled back explicitly on error.
//!
//! Table and column names follow the existing clinic database
//! (`Doctors.DoctorID`, `Appointments.AppointmentDate`, ...). Missing tables
//! are created on open and empty tables receive the reference records.

use super::seed::{SEED_DOCTORS, SEED_PATIENTS};
use super::{ClinicStore, DeleteOutcome, DeletePolicy};
use crate::libs::appointment::{AppointmentForm, AppointmentView};
use crate::libs::doctor::{Doctor, DoctorForm};
use crate::libs::error::Result;
use crate::libs::patient::{Patient, PatientForm};
use std::future::Future;
use tiberius::{Client, Config, FromSql, Row};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

type MssqlClient = Client<Compat<TcpStream>>;

const PROVISION_SCHEMA: &str = "
IF OBJECT_ID(N'dbo.Doctors', N'U') IS NULL
    CREATE TABLE dbo.Doctors (
        DoctorID INT IDENTITY(1,1) PRIMARY KEY,
        FullName NVARCHAR(100) NOT NULL,
        Specialty NVARCHAR(100) NOT NULL,
        Availability BIT NOT NULL DEFAULT 1,
        PhoneNumber NVARCHAR(20) NULL
    );
IF COL_LENGTH(N'dbo.Doctors', N'PhoneNumber') IS NULL
    ALTER TABLE dbo.Doctors ADD PhoneNumber NVARCHAR(20) NULL;
IF OBJECT_ID(N'dbo.Patients', N'U') IS NULL
    CREATE TABLE dbo.Patients (
        PatientID INT IDENTITY(1,1) PRIMARY KEY,
        FullName NVARCHAR(100) NOT NULL,
        Email NVARCHAR(100) NOT NULL
    );
IF OBJECT_ID(N'dbo.Appointments', N'U') IS NULL
    CREATE TABLE dbo.Appointments (
        AppointmentID INT IDENTITY(1,1) PRIMARY KEY,
        DoctorID INT NOT NULL REFERENCES dbo.Doctors(DoctorID),
        PatientID INT NOT NULL REFERENCES dbo.Patients(PatientID),
        AppointmentDate DATETIME2 NOT NULL,
        Notes NVARCHAR(500) NULL
    );";

const COUNT_SEEDED: &str = "SELECT (SELECT COUNT(*) FROM Doctors) AS Doctors, (SELECT COUNT(*) FROM Patients) AS Patients";

const SELECT_DOCTORS: &str = "SELECT DoctorID, FullName, Specialty, Availability, PhoneNumber FROM Doctors";
const INSERT_DOCTOR: &str = "INSERT INTO Doctors (FullName, Specialty, Availability, PhoneNumber)
    OUTPUT INSERTED.DoctorID
    VALUES (@P1, @P2, @P3, @P4)";
const UPDATE_DOCTOR: &str =
    "UPDATE Doctors SET FullName = @P2, Specialty = @P3, Availability = @P4, PhoneNumber = @P5 WHERE DoctorID = @P1";
const UPDATE_DOCTOR_AVAILABILITY: &str = "UPDATE Doctors SET Availability = @P2 WHERE DoctorID = @P1";

const SELECT_PATIENTS: &str = "SELECT PatientID, FullName, Email FROM Patients";
const INSERT_PATIENT: &str = "INSERT INTO Patients (FullName, Email) OUTPUT INSERTED.PatientID VALUES (@P1, @P2)";
const UPDATE_PATIENT: &str = "UPDATE Patients SET FullName = @P2, Email = @P3 WHERE PatientID = @P1";

const SELECT_APPOINTMENT_VIEWS: &str = "SELECT a.AppointmentID, a.AppointmentDate, a.Notes,
        d.FullName AS DoctorName, d.Specialty,
        p.FullName AS PatientName, p.Email AS PatientEmail,
        a.DoctorID, a.PatientID
    FROM Appointments a
    INNER JOIN Doctors d ON a.DoctorID = d.DoctorID
    INNER JOIN Patients p ON a.PatientID = p.PatientID";
const ORDER_BY_DATE_DESC: &str = "ORDER BY a.AppointmentDate DESC, a.AppointmentID DESC";
const INSERT_APPOINTMENT: &str = "INSERT INTO Appointments (DoctorID, PatientID, AppointmentDate, Notes)
    OUTPUT INSERTED.AppointmentID
    VALUES (@P1, @P2, @P3, @P4)";
const UPDATE_APPOINTMENT: &str = "UPDATE Appointments
    SET DoctorID = @P2, PatientID = @P3, AppointmentDate = @P4, Notes = @P5
    WHERE AppointmentID = @P1";
const DELETE_APPOINTMENT: &str = "DELETE FROM Appointments WHERE AppointmentID = @P1";

/// Which foreign key a doctor/patient delete has to look at.
#[derive(Clone, Copy)]
enum Owner {
    Doctor,
    Patient,
}

impl Owner {
    fn table(self) -> &'static str {
        match self {
            Owner::Doctor => "Doctors",
            Owner::Patient => "Patients",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Owner::Doctor => "DoctorID",
            Owner::Patient => "PatientID",
        }
    }
}

pub struct MssqlStore {
    config: Config,
    runtime: Runtime,
    policy: DeletePolicy,
}

impl MssqlStore {
    /// The server refuses deletes that would orphan appointments.
    pub const DEFAULT_DELETE_POLICY: DeletePolicy = DeletePolicy::Block;

    /// Parses an ADO.NET style connection string, checks that the server is
    /// reachable and makes sure the schema and reference records exist.
    pub fn open(connection_string: &str) -> Result<Self> {
        let config = Config::from_ado_string(connection_string)?;
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let store = MssqlStore {
            config,
            runtime,
            policy: Self::DEFAULT_DELETE_POLICY,
        };
        store.provision()?;
        tracing::debug!(addr = %store.config.get_addr(), "sql server store opened");

        Ok(store)
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn connect(config: Config) -> Result<MssqlClient> {
        let tcp = TcpStream::connect(config.get_addr()).await?;
        tcp.set_nodelay(true).ok();

        Ok(Client::connect(config, tcp.compat_write()).await?)
    }

    /// Runs one operation on a fresh connection, logging failures.
    fn run<T, F, Fut>(&self, action: &str, op: F) -> Result<T>
    where
        F: FnOnce(MssqlClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let config = self.config.clone();
        self.runtime
            .block_on(async move {
                let client = Self::connect(config).await?;
                op(client).await
            })
            .map_err(|e| {
                tracing::error!(error = %e, "error {}", action);
                e
            })
    }

    fn provision(&self) -> Result<()> {
        self.run("provisioning schema", |mut client| async move {
            client.execute(PROVISION_SCHEMA, &[]).await?;

            let row = client.simple_query(COUNT_SEEDED).await?.into_row().await?;
            let (doctors, patients): (i32, i32) = match row {
                Some(row) => (column(&row, "Doctors")?, column(&row, "Patients")?),
                None => (0, 0),
            };

            if doctors == 0 {
                for (full_name, specialty, available, phone) in SEED_DOCTORS {
                    client
                        .query(INSERT_DOCTOR, &[&full_name, &specialty, &available, &phone])
                        .await?
                        .into_results()
                        .await?;
                }
                tracing::info!(count = SEED_DOCTORS.len(), "seeded doctors");
            }
            if patients == 0 {
                for (full_name, email) in SEED_PATIENTS {
                    client.query(INSERT_PATIENT, &[&full_name, &email]).await?.into_results().await?;
                }
                tracing::info!(count = SEED_PATIENTS.len(), "seeded patients");
            }

            Ok(())
        })
    }

    fn query_doctors(&self, sql: String) -> Result<Vec<Doctor>> {
        self.run("getting doctors", |mut client| async move {
            let rows = client.simple_query(sql).await?.into_first_result().await?;
            rows.iter().map(doctor_from_row).collect()
        })
    }

    fn query_views(&self, filter: &str, id: Option<i32>) -> Result<Vec<AppointmentView>> {
        let sql = format!("{} {} {}", SELECT_APPOINTMENT_VIEWS, filter, ORDER_BY_DATE_DESC);
        self.run("getting appointments", |mut client| async move {
            let stream = match id {
                Some(id) => client.query(sql, &[&id]).await?,
                None => client.simple_query(sql).await?,
            };
            let rows = stream.into_first_result().await?;
            rows.iter().map(view_from_row).collect()
        })
    }

    /// Single-row insert whose statement outputs the new identity.
    async fn insert_returning_id(client: &mut MssqlClient, sql: &str, params: &[&dyn tiberius::ToSql]) -> Result<i32> {
        let row = client.query(sql, params).await?.into_row().await?;
        match row.as_ref().and_then(|row| row.get::<i32, _>(0usize)) {
            Some(id) => Ok(id),
            None => Err(tiberius::error::Error::Conversion("insert returned no identity".into()).into()),
        }
    }

    fn delete_owner(&self, owner: Owner, id: i32) -> Result<DeleteOutcome> {
        let policy = self.policy;
        self.run("deleting record", |mut client| async move {
            client.simple_query("SET XACT_ABORT ON; BEGIN TRANSACTION").await?.into_results().await?;

            match delete_owner_in_transaction(&mut client, owner, id, policy).await {
                Ok(outcome) => {
                    client.simple_query("COMMIT TRANSACTION").await?.into_results().await?;
                    Ok(outcome)
                }
                Err(e) => {
                    // The rollback may itself fail if the server already aborted.
                    if let Ok(stream) = client.simple_query("IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION").await {
                        stream.into_results().await.ok();
                    }
                    Err(e)
                }
            }
        })
    }
}

async fn delete_owner_in_transaction(
    client: &mut MssqlClient,
    owner: Owner,
    id: i32,
    policy: DeletePolicy,
) -> Result<DeleteOutcome> {
    let check = format!(
        "SELECT (SELECT COUNT(*) FROM {table} WITH (UPDLOCK) WHERE {key} = @P1) AS Found,
                (SELECT COUNT(*) FROM Appointments WHERE {key} = @P1) AS Dependents",
        table = owner.table(),
        key = owner.key(),
    );
    let row = client.query(check, &[&id]).await?.into_row().await?;
    let (found, dependents): (i32, i32) = match row {
        Some(row) => (column(&row, "Found")?, column(&row, "Dependents")?),
        None => (0, 0),
    };

    if found == 0 {
        return Ok(DeleteOutcome::NotFound);
    }

    let cascaded = match (policy, dependents as usize) {
        (_, 0) => 0,
        (DeletePolicy::Block, n) => return Ok(DeleteOutcome::Blocked { appointments: n }),
        (DeletePolicy::Cascade, _) => {
            let sql = format!("DELETE FROM Appointments WHERE {} = @P1", owner.key());
            client.execute(sql, &[&id]).await?.total() as usize
        }
    };

    let sql = format!("DELETE FROM {} WHERE {} = @P1", owner.table(), owner.key());
    client.execute(sql, &[&id]).await?;

    Ok(DeleteOutcome::Deleted { cascaded })
}

/// Reads a non-null column, treating NULL as a conversion error.
fn column<'a, R: FromSql<'a>>(row: &'a Row, name: &str) -> Result<R> {
    row.try_get::<R, _>(name)?
        .ok_or_else(|| tiberius::error::Error::Conversion(format!("unexpected NULL in column {}", name).into()).into())
}

fn text(row: &Row, name: &str) -> Result<String> {
    column::<&str>(row, name).map(str::to_string)
}

fn doctor_from_row(row: &Row) -> Result<Doctor> {
    Ok(Doctor {
        id: column(row, "DoctorID")?,
        full_name: text(row, "FullName")?,
        specialty: text(row, "Specialty")?,
        available: column(row, "Availability")?,
        phone: row.try_get::<&str, _>("PhoneNumber")?.map(str::to_string),
    })
}

fn patient_from_row(row: &Row) -> Result<Patient> {
    Ok(Patient {
        id: column(row, "PatientID")?,
        full_name: text(row, "FullName")?,
        email: text(row, "Email")?,
    })
}

fn view_from_row(row: &Row) -> Result<AppointmentView> {
    Ok(AppointmentView {
        id: column(row, "AppointmentID")?,
        date: column(row, "AppointmentDate")?,
        notes: row.try_get::<&str, _>("Notes")?.map(str::to_string),
        doctor_name: text(row, "DoctorName")?,
        specialty: text(row, "Specialty")?,
        patient_name: text(row, "PatientName")?,
        patient_email: text(row, "PatientEmail")?,
        doctor_id: column(row, "DoctorID")?,
        patient_id: column(row, "PatientID")?,
    })
}

impl ClinicStore for MssqlStore {
    fn backend_name(&self) -> &'static str {
        "mssql"
    }

    fn delete_policy(&self) -> DeletePolicy {
        self.policy
    }

    fn doctors(&mut self) -> Result<Vec<Doctor>> {
        self.query_doctors(format!("{} ORDER BY DoctorID", SELECT_DOCTORS))
    }

    fn available_doctors(&mut self) -> Result<Vec<Doctor>> {
        self.query_doctors(format!("{} WHERE Availability = 1 ORDER BY DoctorID", SELECT_DOCTORS))
    }

    fn doctor(&mut self, id: i32) -> Result<Option<Doctor>> {
        self.run("getting doctor", |mut client| async move {
            let sql = format!("{} WHERE DoctorID = @P1", SELECT_DOCTORS);
            let row = client.query(sql, &[&id]).await?.into_row().await?;
            row.as_ref().map(doctor_from_row).transpose()
        })
    }

    fn add_doctor(&mut self, form: &DoctorForm) -> Result<i32> {
        self.run("creating doctor", |mut client| async move {
            let phone = form.phone.as_deref();
            Self::insert_returning_id(
                &mut client,
                INSERT_DOCTOR,
                &[&form.full_name.as_str(), &form.specialty.as_str(), &form.available, &phone],
            )
            .await
        })
    }

    fn update_doctor(&mut self, id: i32, form: &DoctorForm) -> Result<bool> {
        self.run("updating doctor", |mut client| async move {
            let phone = form.phone.as_deref();
            let result = client
                .execute(
                    UPDATE_DOCTOR,
                    &[&id, &form.full_name.as_str(), &form.specialty.as_str(), &form.available, &phone],
                )
                .await?;
            Ok(result.total() > 0)
        })
    }

    fn set_doctor_availability(&mut self, id: i32, available: bool) -> Result<bool> {
        self.run("updating doctor availability", |mut client| async move {
            let result = client.execute(UPDATE_DOCTOR_AVAILABILITY, &[&id, &available]).await?;
            Ok(result.total() > 0)
        })
    }

    fn delete_doctor(&mut self, id: i32) -> Result<DeleteOutcome> {
        self.delete_owner(Owner::Doctor, id)
    }

    fn patients(&mut self) -> Result<Vec<Patient>> {
        self.run("getting patients", |mut client| async move {
            let sql = format!("{} ORDER BY PatientID", SELECT_PATIENTS);
            let rows = client.simple_query(sql).await?.into_first_result().await?;
            rows.iter().map(patient_from_row).collect()
        })
    }

    fn patient(&mut self, id: i32) -> Result<Option<Patient>> {
        self.run("getting patient", |mut client| async move {
            let sql = format!("{} WHERE PatientID = @P1", SELECT_PATIENTS);
            let row = client.query(sql, &[&id]).await?.into_row().await?;
            row.as_ref().map(patient_from_row).transpose()
        })
    }

    fn add_patient(&mut self, form: &PatientForm) -> Result<i32> {
        self.run("creating patient", |mut client| async move {
            Self::insert_returning_id(&mut client, INSERT_PATIENT, &[&form.full_name.as_str(), &form.email.as_str()]).await
        })
    }

    fn update_patient(&mut self, id: i32, form: &PatientForm) -> Result<bool> {
        self.run("updating patient", |mut client| async move {
            let result = client
                .execute(UPDATE_PATIENT, &[&id, &form.full_name.as_str(), &form.email.as_str()])
                .await?;
            Ok(result.total() > 0)
        })
    }

    fn delete_patient(&mut self, id: i32) -> Result<DeleteOutcome> {
        self.delete_owner(Owner::Patient, id)
    }

    fn appointments(&mut self) -> Result<Vec<AppointmentView>> {
        self.query_views("", None)
    }

    fn appointments_by_doctor(&mut self, doctor_id: i32) -> Result<Vec<AppointmentView>> {
        self.query_views("WHERE a.DoctorID = @P1", Some(doctor_id))
    }

    fn appointments_by_patient(&mut self, patient_id: i32) -> Result<Vec<AppointmentView>> {
        self.query_views("WHERE a.PatientID = @P1", Some(patient_id))
    }

    fn appointment(&mut self, id: i32) -> Result<Option<AppointmentView>> {
        Ok(self.query_views("WHERE a.AppointmentID = @P1", Some(id))?.into_iter().next())
    }

    fn book_appointment(&mut self, form: &AppointmentForm) -> Result<i32> {
        self.run("creating appointment", |mut client| async move {
            let notes = form.notes.as_deref();
            Self::insert_returning_id(
                &mut client,
                INSERT_APPOINTMENT,
                &[&form.doctor_id, &form.patient_id, &form.date, &notes],
            )
            .await
        })
    }

    fn update_appointment(&mut self, id: i32, form: &AppointmentForm) -> Result<bool> {
        self.run("updating appointment", |mut client| async move {
            let notes = form.notes.as_deref();
            let result = client
                .execute(UPDATE_APPOINTMENT, &[&id, &form.doctor_id, &form.patient_id, &form.date, &notes])
                .await?;
            Ok(result.total() > 0)
        })
    }

    fn delete_appointment(&mut self, id: i32) -> Result<bool> {
        self.run("deleting appointment", |mut client| async move {
            let result = client.execute(DELETE_APPOINTMENT, &[&id]).await?;
            Ok(result.total() > 0)
        })
    }
}
