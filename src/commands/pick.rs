//! Prompts shared by the doctor, patient and appointment forms.

use crate::db::ClinicStore;
use crate::libs::appointment::AppointmentView;
use crate::libs::doctor::{Doctor, SPECIALTIES};
use crate::libs::formatter::{format_date_time, parse_date_time};
use crate::libs::messages::Message;
use crate::libs::patient::Patient;
use crate::msg_info;
use anyhow::Result;
use chrono::NaiveDateTime;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

/// Lets the user choose a doctor; `None` when there is nothing to choose from.
pub fn doctor(store: &mut dyn ClinicStore, available_only: bool, current: Option<i32>) -> Result<Option<Doctor>> {
    let mut doctors = if available_only { store.available_doctors()? } else { store.doctors()? };
    if doctors.is_empty() {
        msg_info!(if available_only { Message::NoAvailableDoctors } else { Message::NoDoctorsFound });
        return Ok(None);
    }

    let items: Vec<String> = doctors
        .iter()
        .map(|d| format!("#{} {} ({})", d.id, d.full_name, d.specialty))
        .collect();
    let default = current.and_then(|id| doctors.iter().position(|d| d.id == id)).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectDoctor.to_string())
        .items(&items)
        .default(default)
        .interact()?;

    Ok(Some(doctors.swap_remove(selection)))
}

pub fn patient(store: &mut dyn ClinicStore, current: Option<i32>) -> Result<Option<Patient>> {
    let mut patients = store.patients()?;
    if patients.is_empty() {
        msg_info!(Message::NoPatientsFound);
        return Ok(None);
    }

    let items: Vec<String> = patients.iter().map(|p| format!("#{} {} <{}>", p.id, p.full_name, p.email)).collect();
    let default = current.and_then(|id| patients.iter().position(|p| p.id == id)).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectPatient.to_string())
        .items(&items)
        .default(default)
        .interact()?;

    Ok(Some(patients.swap_remove(selection)))
}

pub fn appointment(store: &mut dyn ClinicStore) -> Result<Option<AppointmentView>> {
    let mut views = store.appointments()?;
    if views.is_empty() {
        msg_info!(Message::NoAppointmentsFound);
        return Ok(None);
    }

    let items: Vec<String> = views
        .iter()
        .map(|v| format!("#{} {} {} / {}", v.id, format_date_time(&v.date), v.doctor_name, v.patient_name))
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectAppointment.to_string())
        .items(&items)
        .interact()?;

    Ok(Some(views.swap_remove(selection)))
}

/// One of the standard specialties, or free text after choosing "Other...".
pub fn specialty(current: Option<&str>) -> Result<String> {
    let mut items: Vec<String> = SPECIALTIES.iter().map(|s| s.to_string()).collect();
    items.push(Message::OtherSpecialty.to_string());

    let default = match current {
        Some(current) => SPECIALTIES.iter().position(|s| *s == current).unwrap_or(SPECIALTIES.len()),
        None => 0,
    };

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptSpecialty.to_string())
        .items(&items)
        .default(default)
        .interact()?;

    if selection < SPECIALTIES.len() {
        return Ok(SPECIALTIES[selection].to_string());
    }

    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(Message::PromptCustomSpecialty.to_string());
    if let Some(current) = current {
        input = input.default(current.to_string());
    }
    Ok(input.interact_text()?)
}

/// Free text; with `optional` an empty answer is accepted.
pub fn text(prompt: Message, current: Option<&str>, optional: bool) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(prompt.to_string())
        .allow_empty(optional);
    if let Some(current) = current {
        input = input.default(current.to_string());
    }
    Ok(input.interact_text()?)
}

/// Date and time, re-asked until it parses.
pub fn date_time(current: Option<NaiveDateTime>) -> Result<NaiveDateTime> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(Message::PromptAppointmentDate.to_string())
        .validate_with(|value: &String| -> std::result::Result<(), String> {
            parse_date_time(value).map(|_| ()).map_err(|_| Message::InvalidDateTime(value.clone()).to_string())
        });
    if let Some(current) = current {
        input = input.default(format_date_time(&current));
    }

    let value = input.interact_text()?;
    parse_date_time(&value)
}

pub fn confirm(prompt: Message) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(false)
        .interact()?)
}
