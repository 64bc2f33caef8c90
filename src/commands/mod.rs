pub mod appointment;
pub mod book;
pub mod doctor;
pub mod export;
pub mod init;
pub mod migrations;
pub mod patient;
pub mod pick;

use crate::db::{self, ClinicStore};
use crate::libs::config::Config;
use crate::libs::error::ClinicError;
use crate::libs::messages::Message;
use crate::msg_error;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Choose the storage backend and delete policy")]
    Init(init::InitArgs),
    #[command(about = "Manage doctors")]
    Doctor(doctor::DoctorArgs),
    #[command(about = "Manage patients")]
    Patient(patient::PatientArgs),
    #[command(about = "Book an appointment")]
    Book(book::BookArgs),
    #[command(about = "List, search, edit and delete appointments")]
    Appointment(appointment::AppointmentArgs),
    #[command(about = "Export doctors, patients or appointments")]
    Export(export::ExportArgs),
    #[command(about = "Show schema version of the SQLite store")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Doctor(args) => doctor::cmd(args),
            Commands::Patient(args) => patient::cmd(args),
            Commands::Book(args) => book::cmd(args),
            Commands::Appointment(args) => appointment::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// Opens the configured store for one command.
pub(crate) fn open_store() -> Result<Box<dyn ClinicStore>> {
    let config = Config::read()?;
    Ok(db::open(&config)?)
}

/// Prints a validation failure and yields `None`; other errors propagate.
pub(crate) fn validated<T>(result: crate::libs::error::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ClinicError::Validation(reason)) => {
            msg_error!(Message::ValidationFailed(reason));
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
