use super::open_store;
use crate::{
    db::ClinicStore,
    libs::{
        appointment::search,
        export::{ExportData, ExportFormat, Exporter},
        messages::Message,
    },
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum, default_value = "appointments")]
    data: ExportData,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only appointments of this doctor
    #[arg(short, long, conflicts_with = "patient")]
    doctor: Option<i32>,

    /// Only appointments of this patient
    #[arg(short, long)]
    patient: Option<i32>,

    /// Only appointments matching this text
    #[arg(short, long)]
    search: Option<String>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let mut store = open_store()?;
    export(store.as_mut(), args)
}

fn export(store: &mut dyn ClinicStore, args: ExportArgs) -> Result<()> {
    if let Some(doctor_id) = args.doctor {
        if store.doctor(doctor_id)?.is_none() {
            msg_bail_anyhow!(Message::DoctorNotFound(doctor_id));
        }
    }
    if let Some(patient_id) = args.patient {
        if store.patient(patient_id)?.is_none() {
            msg_bail_anyhow!(Message::PatientNotFound(patient_id));
        }
    }

    let exporter = Exporter::new(args.format, args.data, args.output);

    let count = match args.data {
        ExportData::Appointments => {
            let views = match (args.doctor, args.patient) {
                (Some(doctor_id), _) => store.appointments_by_doctor(doctor_id)?,
                (_, Some(patient_id)) => store.appointments_by_patient(patient_id)?,
                _ => store.appointments()?,
            };
            let views = match &args.search {
                Some(query) => search(views, query),
                None => views,
            };
            if !views.is_empty() {
                exporter.export_appointments(&views).map_err(|e| msg_error_anyhow!(Message::ExportFailed(e.to_string())))?;
            }
            views.len()
        }
        ExportData::Doctors => {
            let doctors = store.doctors()?;
            if !doctors.is_empty() {
                exporter.export_doctors(&doctors).map_err(|e| msg_error_anyhow!(Message::ExportFailed(e.to_string())))?;
            }
            doctors.len()
        }
        ExportData::Patients => {
            let patients = store.patients()?;
            if !patients.is_empty() {
                exporter.export_patients(&patients).map_err(|e| msg_error_anyhow!(Message::ExportFailed(e.to_string())))?;
            }
            patients.len()
        }
    };

    if count == 0 {
        msg_info!(Message::ExportNothingToExport);
    } else {
        msg_success!(Message::ExportCompleted(exporter.output_path().display().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::SqliteStore;

    fn args(output: PathBuf) -> ExportArgs {
        ExportArgs {
            data: ExportData::Doctors,
            format: ExportFormat::Json,
            output: Some(output),
            doctor: None,
            patient: None,
            search: None,
        }
    }

    #[test]
    fn test_unknown_filter_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = SqliteStore::open_in_memory().unwrap();
        let output = temp_dir.path().join("out.json");

        let err = export(&mut store, ExportArgs { doctor: Some(999), ..args(output.clone()) }).unwrap_err();
        assert!(err.to_string().contains("Doctor with ID 999 not found"));

        let err = export(&mut store, ExportArgs { patient: Some(999), ..args(output.clone()) }).unwrap_err();
        assert!(err.to_string().contains("Patient with ID 999 not found"));
        assert!(!output.exists());
    }

    #[test]
    fn test_known_filter_exports() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = SqliteStore::open_in_memory().unwrap();
        let output = temp_dir.path().join("doctors.json");

        export(&mut store, ExportArgs { doctor: Some(1), ..args(output.clone()) }).unwrap();
        assert!(output.exists());
    }
}
