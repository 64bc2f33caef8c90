use super::{open_store, pick, validated};
use crate::{
    db::{ClinicStore, DeleteOutcome},
    libs::{messages::Message, patient::PatientForm, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Select};

#[derive(Debug, Args)]
pub struct PatientArgs {
    #[command(subcommand)]
    command: Option<PatientCommand>,
}

#[derive(Debug, Subcommand)]
enum PatientCommand {
    /// List patients
    List,
    /// Register a patient
    Add {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Edit a patient's details
    Edit { id: Option<i32> },
    /// Delete a patient
    Delete {
        id: Option<i32>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List a patient's appointments
    Appointments { id: Option<i32> },
}

pub fn cmd(args: PatientArgs) -> Result<()> {
    let mut store = open_store()?;
    let store = store.as_mut();

    match args.command {
        Some(PatientCommand::List) => handle_list(store),
        Some(PatientCommand::Add { name, email }) => handle_add(store, name, email),
        Some(PatientCommand::Edit { id }) => handle_edit(store, id),
        Some(PatientCommand::Delete { id, yes }) => handle_delete(store, id, yes),
        Some(PatientCommand::Appointments { id }) => handle_appointments(store, id),
        None => handle_interactive(store),
    }
}

fn handle_list(store: &mut dyn ClinicStore) -> Result<()> {
    let patients = store.patients()?;

    if patients.is_empty() {
        msg_info!(Message::NoPatientsFound);
        return Ok(());
    }

    msg_print!(Message::PatientsHeader, true);
    View::patients(&patients);
    Ok(())
}

fn handle_add(store: &mut dyn ClinicStore, name: Option<String>, email: Option<String>) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => pick::text(Message::PromptPatientName, None, false)?,
    };
    let email = match email {
        Some(email) => email,
        None => pick::text(Message::PromptPatientEmail, None, false)?,
    };

    let Some(form) = validated(PatientForm::new(&name, &email).validated())? else {
        return Ok(());
    };

    let id = store.add_patient(&form)?;
    msg_success!(Message::PatientCreated(id));
    Ok(())
}

fn handle_edit(store: &mut dyn ClinicStore, id: Option<i32>) -> Result<()> {
    let patient = match id {
        Some(id) => match store.patient(id)? {
            Some(patient) => patient,
            None => {
                msg_error!(Message::PatientNotFound(id));
                return Ok(());
            }
        },
        None => match pick::patient(store, None)? {
            Some(patient) => patient,
            None => return Ok(()),
        },
    };

    msg_print!(Message::EditingPatient(patient.full_name.clone()), true);

    let name = pick::text(Message::PromptPatientName, Some(&patient.full_name), false)?;
    let email = pick::text(Message::PromptPatientEmail, Some(&patient.email), false)?;

    let Some(form) = validated(PatientForm::new(&name, &email).validated())? else {
        return Ok(());
    };

    if store.update_patient(patient.id, &form)? {
        msg_success!(Message::PatientUpdated(patient.id));
    } else {
        msg_error!(Message::PatientNotFound(patient.id));
    }
    Ok(())
}

fn handle_delete(store: &mut dyn ClinicStore, id: Option<i32>, yes: bool) -> Result<()> {
    let patient = match id {
        Some(id) => store.patient(id)?,
        None => pick::patient(store, None)?,
    };
    let Some(patient) = patient else {
        if let Some(id) = id {
            msg_error!(Message::PatientNotFound(id));
        }
        return Ok(());
    };

    if !yes && !pick::confirm(Message::ConfirmDeletePatient(patient.full_name.clone()))? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    let id = patient.id;
    match store.delete_patient(id)? {
        DeleteOutcome::Deleted { cascaded: 0 } => msg_success!(Message::PatientDeleted(id)),
        DeleteOutcome::Deleted { cascaded } => msg_success!(Message::PatientDeletedWithAppointments(id, cascaded)),
        DeleteOutcome::Blocked { appointments } => msg_error!(Message::PatientDeleteBlocked(id, appointments)),
        DeleteOutcome::NotFound => msg_error!(Message::PatientNotFound(id)),
    }
    Ok(())
}

fn handle_appointments(store: &mut dyn ClinicStore, id: Option<i32>) -> Result<()> {
    let patient = match id {
        Some(id) => store.patient(id)?,
        None => pick::patient(store, None)?,
    };
    let Some(patient) = patient else {
        if let Some(id) = id {
            msg_error!(Message::PatientNotFound(id));
        }
        return Ok(());
    };

    let views = store.appointments_by_patient(patient.id)?;
    if views.is_empty() {
        msg_info!(Message::NoAppointmentsFound);
        return Ok(());
    }

    msg_print!(Message::PatientAppointmentsHeader(patient.full_name), true);
    View::appointments(&views);
    Ok(())
}

fn handle_interactive(store: &mut dyn ClinicStore) -> Result<()> {
    let options = vec!["List patients", "Add patient", "Edit patient", "Delete patient", "Show appointments"];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectPatientAction.to_string())
        .items(&options)
        .interact()?;

    match selection {
        0 => handle_list(store),
        1 => handle_add(store, None, None),
        2 => handle_edit(store, None),
        3 => handle_delete(store, None, false),
        4 => handle_appointments(store, None),
        _ => Ok(()),
    }
}
