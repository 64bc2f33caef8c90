//! Writes doctor, patient and appointment listings to CSV, JSON or Excel.
//!
//! JSON output is the serialized records; CSV and Excel share one tabular
//! layout with a header row.

use super::appointment::AppointmentView;
use super::doctor::Doctor;
use super::formatter::format_date_time;
use super::patient::Patient;
use anyhow::Result;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportData {
    Appointments,
    Doctors,
    Patients,
}

impl ExportData {
    fn file_stem(&self) -> &'static str {
        match self {
            ExportData::Appointments => "appointments",
            ExportData::Doctors => "doctors",
            ExportData::Patients => "patients",
        }
    }
}

enum Cell {
    Number(f64),
    Text(String),
}

/// Header row plus data rows shared by the CSV and Excel writers.
struct Sheet {
    name: &'static str,
    headers: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn appointments(views: &[AppointmentView]) -> Self {
        Sheet {
            name: "Appointments",
            headers: &["ID", "Date", "Doctor", "Specialty", "Patient", "Email", "Notes"],
            rows: views
                .iter()
                .map(|view| {
                    vec![
                        Cell::Number(view.id as f64),
                        Cell::Text(format_date_time(&view.date)),
                        Cell::Text(view.doctor_name.clone()),
                        Cell::Text(view.specialty.clone()),
                        Cell::Text(view.patient_name.clone()),
                        Cell::Text(view.patient_email.clone()),
                        Cell::Text(view.notes.clone().unwrap_or_default()),
                    ]
                })
                .collect(),
        }
    }

    fn doctors(doctors: &[Doctor]) -> Self {
        Sheet {
            name: "Doctors",
            headers: &["ID", "Full name", "Specialty", "Available", "Phone"],
            rows: doctors
                .iter()
                .map(|doctor| {
                    vec![
                        Cell::Number(doctor.id as f64),
                        Cell::Text(doctor.full_name.clone()),
                        Cell::Text(doctor.specialty.clone()),
                        Cell::Text(if doctor.available { "Yes" } else { "No" }.to_string()),
                        Cell::Text(doctor.phone.clone().unwrap_or_default()),
                    ]
                })
                .collect(),
        }
    }

    fn patients(patients: &[Patient]) -> Self {
        Sheet {
            name: "Patients",
            headers: &["ID", "Full name", "Email"],
            rows: patients
                .iter()
                .map(|patient| {
                    vec![
                        Cell::Number(patient.id as f64),
                        Cell::Text(patient.full_name.clone()),
                        Cell::Text(patient.email.clone()),
                    ]
                })
                .collect(),
        }
    }
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without an explicit path the file is named after the data and the
    /// current time, e.g. `appointments_20250301_101500.csv`.
    pub fn new(format: ExportFormat, data: ExportData, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}_{}.{}",
                data.file_stem(),
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export_appointments(&self, views: &[AppointmentView]) -> Result<()> {
        self.write(views, Sheet::appointments(views))
    }

    pub fn export_doctors(&self, doctors: &[Doctor]) -> Result<()> {
        self.write(doctors, Sheet::doctors(doctors))
    }

    pub fn export_patients(&self, patients: &[Patient]) -> Result<()> {
        self.write(patients, Sheet::patients(patients))
    }

    fn write<T: Serialize>(&self, records: &[T], sheet: Sheet) -> Result<()> {
        match self.format {
            ExportFormat::Json => {
                let json = serde_json::to_string_pretty(records)?;
                File::create(&self.output_path)?.write_all(json.as_bytes())?;
            }
            ExportFormat::Csv => self.write_csv(&sheet)?,
            ExportFormat::Excel => self.write_excel(&sheet)?,
        }

        tracing::debug!(path = %self.output_path.display(), rows = records.len(), "export written");
        Ok(())
    }

    fn write_csv(&self, sheet: &Sheet) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(sheet.headers)?;

        for row in &sheet.rows {
            wtr.write_record(row.iter().map(|cell| match cell {
                Cell::Number(n) => n.to_string(),
                Cell::Text(s) => s.clone(),
            }))?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_excel(&self, sheet: &Sheet) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        let header_format = Format::new().set_bold().set_background_color(rust_xlsxwriter::Color::Gray);
        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (i, row) in sheet.rows.iter().enumerate() {
            let row_idx = i as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Number(n) => worksheet.write_number(row_idx, col as u16, *n)?,
                    Cell::Text(s) => worksheet.write_string(row_idx, col as u16, s)?,
                };
            }
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }
}
