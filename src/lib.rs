//! # medapp - clinic desk for doctors, patients and appointments
//!
//! Doctors, patients and appointments are kept in one of three
//! interchangeable stores behind the [`db::ClinicStore`] trait:
//!
//! - **SQLite**: a local `medapp.db` with versioned migrations (default),
//! - **SQL Server**: an existing clinic database reached by connection string,
//! - **JSON files**: `doctors.json`, `patients.json` and `appointments.json`.
//!
//! The [`commands`] module holds the terminal forms built on top of it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use medapp::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
