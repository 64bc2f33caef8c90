//! Error types shared by the data-access layer and the input forms.

use thiserror::Error;

/// Errors raised by stores and form validation.
#[derive(Error, Debug)]
pub enum ClinicError {
    /// SQLite connection or query error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// SQL Server connection or query error
    #[error("SQL Server error: {0}")]
    Mssql(#[from] tiberius::error::Error),

    /// IO error (data files, runtime setup)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record absent
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Required field missing or invalid
    #[error("{0}")]
    Validation(String),

    /// Delete refused because appointments still reference the record
    #[error("{entity} with ID {id} has {appointments} appointment(s) and cannot be deleted")]
    HasAppointments { entity: &'static str, id: i32, appointments: usize },

    /// Store could not be opened with the given settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClinicError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClinicError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        ClinicError::NotFound { entity, id }
    }

    /// True for errors the user can fix by changing the input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, ClinicError::Validation(_) | ClinicError::NotFound { .. } | ClinicError::HasAppointments { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;
