use super::appointment::AppointmentView;
use super::doctor::Doctor;
use super::formatter::format_date_time;
use super::patient::Patient;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn doctors(doctors: &[Doctor]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "FULL NAME", "SPECIALTY", "AVAILABLE", "PHONE"]);
        for doctor in doctors {
            table.add_row(row![
                doctor.id,
                doctor.full_name,
                doctor.specialty,
                if doctor.available { "yes" } else { "no" },
                doctor.phone.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();
    }

    pub fn patients(patients: &[Patient]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "FULL NAME", "EMAIL"]);
        for patient in patients {
            table.add_row(row![patient.id, patient.full_name, patient.email]);
        }
        table.printstd();
    }

    pub fn appointments(views: &[AppointmentView]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "DOCTOR", "SPECIALTY", "PATIENT", "EMAIL", "NOTES"]);
        for view in views {
            table.add_row(row![
                view.id,
                format_date_time(&view.date),
                view.doctor_name,
                view.specialty,
                view.patient_name,
                view.patient_email,
                view.notes.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();
    }

    /// One appointment as a two-column field/value table.
    pub fn appointment(view: &AppointmentView) {
        let mut table = Table::new();

        table.add_row(row!["Date", format_date_time(&view.date)]);
        table.add_row(row!["Doctor", format!("{} (ID {})", view.doctor_name, view.doctor_id)]);
        table.add_row(row!["Specialty", view.specialty]);
        table.add_row(row!["Patient", format!("{} (ID {})", view.patient_name, view.patient_id)]);
        table.add_row(row!["Email", view.patient_email]);
        table.add_row(row!["Notes", view.notes.as_deref().unwrap_or("")]);
        table.printstd();
    }
}
