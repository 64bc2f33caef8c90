use super::{open_store, pick, validated};
use crate::{
    db::ClinicStore,
    libs::{
        appointment::{search, AppointmentForm, AppointmentView},
        messages::Message,
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Select};

#[derive(Debug, Args)]
pub struct AppointmentArgs {
    #[command(subcommand)]
    command: Option<AppointmentCommand>,
}

#[derive(Debug, Subcommand)]
enum AppointmentCommand {
    /// List appointments, newest first
    List {
        #[arg(short, long, conflicts_with = "patient")]
        doctor: Option<i32>,
        #[arg(short, long)]
        patient: Option<i32>,
    },
    /// Search by patient name, doctor name or notes
    Search { query: Option<String> },
    /// Show one appointment
    Show { id: Option<i32> },
    /// Reassign, reschedule or change notes
    Edit { id: Option<i32> },
    /// Delete an appointment
    Delete {
        id: Option<i32>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: AppointmentArgs) -> Result<()> {
    let mut store = open_store()?;
    let store = store.as_mut();

    match args.command {
        Some(AppointmentCommand::List { doctor, patient }) => handle_list(store, doctor, patient),
        Some(AppointmentCommand::Search { query }) => handle_search(store, query),
        Some(AppointmentCommand::Show { id }) => handle_show(store, id),
        Some(AppointmentCommand::Edit { id }) => handle_edit(store, id),
        Some(AppointmentCommand::Delete { id, yes }) => handle_delete(store, id, yes),
        None => handle_interactive(store),
    }
}

fn handle_list(store: &mut dyn ClinicStore, doctor: Option<i32>, patient: Option<i32>) -> Result<()> {
    let views = match (doctor, patient) {
        (Some(doctor_id), _) => store.appointments_by_doctor(doctor_id)?,
        (_, Some(patient_id)) => store.appointments_by_patient(patient_id)?,
        _ => store.appointments()?,
    };

    if views.is_empty() {
        msg_info!(Message::NoAppointmentsFound);
        return Ok(());
    }

    msg_print!(Message::AppointmentsHeader, true);
    View::appointments(&views);
    Ok(())
}

fn handle_search(store: &mut dyn ClinicStore, query: Option<String>) -> Result<()> {
    let query = match query {
        Some(query) => query,
        None => pick::text(Message::PromptSearchQuery, None, true)?,
    };

    let views = search(store.appointments()?, &query);
    if views.is_empty() {
        msg_info!(Message::NoAppointmentsMatching(query));
        return Ok(());
    }

    msg_print!(Message::AppointmentSearchResults(query), true);
    View::appointments(&views);
    Ok(())
}

/// Looks up the given ID, or lets the user pick from the full listing.
fn resolve(store: &mut dyn ClinicStore, id: Option<i32>) -> Result<Option<AppointmentView>> {
    match id {
        Some(id) => {
            let view = store.appointment(id)?;
            if view.is_none() {
                msg_error!(Message::AppointmentNotFound(id));
            }
            Ok(view)
        }
        None => pick::appointment(store),
    }
}

fn handle_show(store: &mut dyn ClinicStore, id: Option<i32>) -> Result<()> {
    let Some(view) = resolve(store, id)? else {
        return Ok(());
    };

    msg_print!(Message::AppointmentDetailsHeader(view.id), true);
    View::appointment(&view);
    Ok(())
}

fn handle_edit(store: &mut dyn ClinicStore, id: Option<i32>) -> Result<()> {
    let Some(view) = resolve(store, id)? else {
        return Ok(());
    };

    msg_print!(Message::EditingAppointment(view.id), true);
    let current = AppointmentForm::from(&view);

    // Reassignment may pick any doctor, not only available ones
    let doctor = pick::doctor(store, false, Some(current.doctor_id))?;
    let patient = pick::patient(store, Some(current.patient_id))?;
    let date = pick::date_time(Some(current.date))?;
    let notes = pick::text(Message::PromptNotes, current.notes.as_deref(), true)?;

    let form = AppointmentForm::from_input(
        doctor.map(|d| d.id),
        patient.map(|p| p.id),
        date,
        &notes,
        Local::now().date_naive(),
    );
    let Some(form) = validated(form)? else {
        return Ok(());
    };

    if store.update_appointment(view.id, &form)? {
        msg_success!(Message::AppointmentUpdated(view.id));
    } else {
        msg_error!(Message::AppointmentNotFound(view.id));
    }
    Ok(())
}

fn handle_delete(store: &mut dyn ClinicStore, id: Option<i32>, yes: bool) -> Result<()> {
    let Some(view) = resolve(store, id)? else {
        return Ok(());
    };

    if !yes && !pick::confirm(Message::ConfirmDeleteAppointment(view.id))? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    if store.delete_appointment(view.id)? {
        msg_success!(Message::AppointmentDeleted(view.id));
    } else {
        msg_error!(Message::AppointmentNotFound(view.id));
    }
    Ok(())
}

fn handle_interactive(store: &mut dyn ClinicStore) -> Result<()> {
    let options = vec![
        "List appointments",
        "Search appointments",
        "Show appointment",
        "Edit appointment",
        "Delete appointment",
    ];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectAppointmentAction.to_string())
        .items(&options)
        .interact()?;

    match selection {
        0 => handle_list(store, None, None),
        1 => handle_search(store, None),
        2 => handle_show(store, None),
        3 => handle_edit(store, None),
        4 => handle_delete(store, None, false),
        _ => Ok(()),
    }
}
