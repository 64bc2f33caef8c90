use super::{open_store, pick, validated};
use crate::{
    db::ClinicStore,
    libs::{appointment::AppointmentForm, formatter::parse_date_time, messages::Message},
    msg_error, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct BookArgs {
    /// Doctor ID; must be accepting appointments
    #[arg(short, long)]
    doctor: Option<i32>,

    /// Patient ID
    #[arg(short, long)]
    patient: Option<i32>,

    /// "YYYY-MM-DD HH:MM", "YYYY-MM-DD", "today 14:00" or "tomorrow 9:30"
    #[arg(short = 't', long)]
    date: Option<String>,

    #[arg(short, long)]
    notes: Option<String>,
}

pub fn cmd(args: BookArgs) -> Result<()> {
    let mut store = open_store()?;
    book(store.as_mut(), args)
}

fn book(store: &mut dyn ClinicStore, args: BookArgs) -> Result<()> {
    let interactive = args.date.is_none();

    let doctor = match args.doctor {
        Some(id) => match store.doctor(id)? {
            Some(doctor) if doctor.available => Some(doctor),
            Some(doctor) => {
                msg_error!(Message::DoctorUnavailable(doctor.full_name));
                return Ok(());
            }
            None => {
                msg_error!(Message::DoctorNotFound(id));
                return Ok(());
            }
        },
        None => pick::doctor(store, true, None)?,
    };

    let patient = match args.patient {
        Some(id) => match store.patient(id)? {
            Some(patient) => Some(patient),
            None => {
                msg_error!(Message::PatientNotFound(id));
                return Ok(());
            }
        },
        None => pick::patient(store, None)?,
    };

    let date = match args.date {
        Some(input) => match parse_date_time(&input) {
            Ok(date) => date,
            Err(_) => {
                msg_error!(Message::InvalidDateTime(input));
                return Ok(());
            }
        },
        None => pick::date_time(None)?,
    };

    let notes = match args.notes {
        Some(notes) => notes,
        None if interactive => pick::text(Message::PromptNotes, None, true)?,
        None => String::new(),
    };

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

    let id = store.book_appointment(&form)?;
    msg_success!(Message::AppointmentBooked(id));
    Ok(())
}
