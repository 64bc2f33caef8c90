use super::{open_store, pick, validated};
use crate::{
    db::{ClinicStore, DeleteOutcome},
    libs::{doctor::DoctorForm, messages::Message, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

#[derive(Debug, Args)]
pub struct DoctorArgs {
    #[command(subcommand)]
    command: Option<DoctorCommand>,
}

#[derive(Debug, Subcommand)]
enum DoctorCommand {
    /// List doctors
    List {
        /// Only doctors accepting appointments
        #[arg(short, long)]
        available: bool,
    },
    /// Add a doctor
    Add {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        specialty: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        /// Register the doctor as not accepting appointments
        #[arg(long)]
        unavailable: bool,
    },
    /// Edit a doctor's details
    Edit { id: Option<i32> },
    /// Toggle whether a doctor accepts appointments
    Availability {
        id: Option<i32>,
        #[arg(long, conflicts_with = "off")]
        on: bool,
        #[arg(long)]
        off: bool,
    },
    /// Delete a doctor
    Delete {
        id: Option<i32>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List a doctor's appointments
    Appointments { id: Option<i32> },
}

pub fn cmd(args: DoctorArgs) -> Result<()> {
    let mut store = open_store()?;
    let store = store.as_mut();

    match args.command {
        Some(DoctorCommand::List { available }) => handle_list(store, available),
        Some(DoctorCommand::Add {
            name,
            specialty,
            phone,
            unavailable,
        }) => handle_add(store, name, specialty, phone, !unavailable),
        Some(DoctorCommand::Edit { id }) => handle_edit(store, id),
        Some(DoctorCommand::Availability { id, on, off }) => {
            let available = match (on, off) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            handle_availability(store, id, available)
        }
        Some(DoctorCommand::Delete { id, yes }) => handle_delete(store, id, yes),
        Some(DoctorCommand::Appointments { id }) => handle_appointments(store, id),
        None => handle_interactive(store),
    }
}

fn handle_list(store: &mut dyn ClinicStore, available: bool) -> Result<()> {
    let doctors = if available { store.available_doctors()? } else { store.doctors()? };

    if doctors.is_empty() {
        msg_info!(if available { Message::NoAvailableDoctors } else { Message::NoDoctorsFound });
        return Ok(());
    }

    msg_print!(if available { Message::AvailableDoctorsHeader } else { Message::DoctorsHeader }, true);
    View::doctors(&doctors);
    Ok(())
}

fn handle_add(store: &mut dyn ClinicStore, name: Option<String>, specialty: Option<String>, phone: Option<String>, available: bool) -> Result<()> {
    let interactive = name.is_none();

    let name = match name {
        Some(name) => name,
        None => pick::text(Message::PromptDoctorName, None, false)?,
    };
    let specialty = match specialty {
        Some(specialty) => specialty,
        None => pick::specialty(None)?,
    };
    let phone = match phone {
        Some(phone) => phone,
        None if interactive => pick::text(Message::PromptPhone, None, true)?,
        None => String::new(),
    };

    let form = DoctorForm::new(&name, &specialty, available).with_phone(&phone);
    let Some(form) = validated(form.validated())? else {
        return Ok(());
    };

    let id = store.add_doctor(&form)?;
    msg_success!(Message::DoctorCreated(id));
    Ok(())
}

fn handle_edit(store: &mut dyn ClinicStore, id: Option<i32>) -> Result<()> {
    let doctor = match id {
        Some(id) => match store.doctor(id)? {
            Some(doctor) => doctor,
            None => {
                msg_error!(Message::DoctorNotFound(id));
                return Ok(());
            }
        },
        None => match pick::doctor(store, false, None)? {
            Some(doctor) => doctor,
            None => return Ok(()),
        },
    };

    msg_print!(Message::EditingDoctor(doctor.full_name.clone()), true);
    let current = DoctorForm::from(&doctor);

    let name = pick::text(Message::PromptDoctorName, Some(&current.full_name), false)?;
    let specialty = pick::specialty(Some(&current.specialty))?;
    let phone = pick::text(Message::PromptPhone, current.phone.as_deref(), true)?;
    let available = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptDoctorAvailable.to_string())
        .default(current.available)
        .interact()?;

    let form = DoctorForm::new(&name, &specialty, available).with_phone(&phone);
    let Some(form) = validated(form.validated())? else {
        return Ok(());
    };

    if store.update_doctor(doctor.id, &form)? {
        msg_success!(Message::DoctorUpdated(doctor.id));
    } else {
        msg_error!(Message::DoctorNotFound(doctor.id));
    }
    Ok(())
}

/// Sets availability, or flips it when no value is given.
fn handle_availability(store: &mut dyn ClinicStore, id: Option<i32>, available: Option<bool>) -> Result<()> {
    let doctor = match id {
        Some(id) => store.doctor(id)?,
        None => pick::doctor(store, false, None)?,
    };
    let Some(doctor) = doctor else {
        if let Some(id) = id {
            msg_error!(Message::DoctorNotFound(id));
        }
        return Ok(());
    };

    let available = available.unwrap_or(!doctor.available);
    if store.set_doctor_availability(doctor.id, available)? {
        msg_success!(Message::DoctorAvailabilityChanged(doctor.id, available));
    } else {
        msg_error!(Message::DoctorNotFound(doctor.id));
    }
    Ok(())
}

fn handle_delete(store: &mut dyn ClinicStore, id: Option<i32>, yes: bool) -> Result<()> {
    let (id, name) = match id {
        Some(id) => match store.doctor(id)? {
            Some(doctor) => (id, doctor.full_name),
            None => {
                msg_error!(Message::DoctorNotFound(id));
                return Ok(());
            }
        },
        None => match pick::doctor(store, false, None)? {
            Some(doctor) => (doctor.id, doctor.full_name),
            None => return Ok(()),
        },
    };

    if !yes && !pick::confirm(Message::ConfirmDeleteDoctor(name))? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    match store.delete_doctor(id)? {
        DeleteOutcome::Deleted { cascaded: 0 } => msg_success!(Message::DoctorDeleted(id)),
        DeleteOutcome::Deleted { cascaded } => msg_success!(Message::DoctorDeletedWithAppointments(id, cascaded)),
        DeleteOutcome::Blocked { appointments } => msg_error!(Message::DoctorDeleteBlocked(id, appointments)),
        DeleteOutcome::NotFound => msg_error!(Message::DoctorNotFound(id)),
    }
    Ok(())
}

fn handle_appointments(store: &mut dyn ClinicStore, id: Option<i32>) -> Result<()> {
    let doctor = match id {
        Some(id) => store.doctor(id)?,
        None => pick::doctor(store, false, None)?,
    };
    let Some(doctor) = doctor else {
        if let Some(id) = id {
            msg_error!(Message::DoctorNotFound(id));
        }
        return Ok(());
    };

    let views = store.appointments_by_doctor(doctor.id)?;
    if views.is_empty() {
        msg_info!(Message::NoAppointmentsFound);
        return Ok(());
    }

    msg_print!(Message::DoctorAppointmentsHeader(doctor.full_name), true);
    View::appointments(&views);
    Ok(())
}

fn handle_interactive(store: &mut dyn ClinicStore) -> Result<()> {
    let options = vec![
        "List doctors",
        "List available doctors",
        "Add doctor",
        "Edit doctor",
        "Toggle availability",
        "Delete doctor",
        "Show appointments",
    ];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectDoctorAction.to_string())
        .items(&options)
        .interact()?;

    match selection {
        0 => handle_list(store, false),
        1 => handle_list(store, true),
        2 => handle_add(store, None, None, None, true),
        3 => handle_edit(store, None),
        4 => handle_availability(store, None, None),
        5 => handle_delete(store, None, false),
        6 => handle_appointments(store, None),
        _ => Ok(()),
    }
}
