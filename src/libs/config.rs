//! Application settings stored as `config.json` in the data directory.
//!
//! The file selects the storage backend and, optionally, overrides the
//! backend's default delete policy:
//!
//! ```json
//! {
//!   "backend": { "type": "mssql", "connection_string": "Server=tcp:localhost,1433;..." },
//!   "delete_policy": "cascade"
//! }
//! ```
//!
//! A missing file means the embedded SQLite backend in the data directory.
//! `MEDAPP_CONNECTION_STRING` (from the environment or a `.env` file) takes
//! precedence over the configured SQL Server connection string.

use super::data_storage::DataStorage;
use crate::db::DeletePolicy;
use crate::libs::messages::Message;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONNECTION_STRING_ENV: &str = "MEDAPP_CONNECTION_STRING";

/// Storage backend and its location.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Embedded database file; `None` means `medapp.db` in the data directory.
    Sqlite {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    /// SQL Server reached through an ADO.NET style connection string.
    Mssql { connection_string: String },
    /// Three JSON files; `None` means `data/` in the data directory.
    Files {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dir: Option<PathBuf>,
    },
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Sqlite { .. } => "sqlite",
            BackendConfig::Mssql { .. } => "mssql",
            BackendConfig::Files { .. } => "files",
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Sqlite { path: None }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    /// Overrides the backend's default handling of dependent appointments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_policy: Option<DeletePolicy>,
}

impl Config {
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    /// Reads the configuration file, or returns defaults when there is none.
    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        self.save_to(&DataStorage::new())
    }

    /// Writes pretty-printed JSON and returns the file path.
    pub fn save_to(&self, storage: &DataStorage) -> Result<PathBuf> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(&config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(config_file_path)
    }

    /// Effective SQL Server connection string: the environment override, then
    /// the configured one. `None` for other backends without an override.
    pub fn connection_string(&self) -> Option<String> {
        dotenv::dotenv().ok();
        if let Some(value) = env::var(CONNECTION_STRING_ENV).ok().filter(|v| !v.trim().is_empty()) {
            return Some(value);
        }

        match &self.backend {
            BackendConfig::Mssql { connection_string } if !connection_string.trim().is_empty() => Some(connection_string.clone()),
            _ => None,
        }
    }

    /// Interactive setup wizard, seeded with the current settings.
    pub fn init() -> Result<Self> {
        let current = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        msg_print!(Message::ConfigModuleStorage, true);
        msg_print!(Message::CurrentBackend(current.backend.name().to_string()));

        let backends = ["SQLite (local database file)", "SQL Server", "JSON files"];
        let default_backend = match current.backend {
            BackendConfig::Sqlite { .. } => 0,
            BackendConfig::Mssql { .. } => 1,
            BackendConfig::Files { .. } => 2,
        };
        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptBackend.to_string())
            .items(&backends)
            .default(default_backend)
            .interact()?;

        let backend = match selection {
            0 => {
                let default = match &current.backend {
                    BackendConfig::Sqlite { path: Some(path) } => path.display().to_string(),
                    _ => String::new(),
                };
                let path: String = Input::with_theme(&theme)
                    .with_prompt(Message::PromptSqlitePath.to_string())
                    .default(default)
                    .allow_empty(true)
                    .interact_text()?;
                BackendConfig::Sqlite { path: optional_path(&path) }
            }
            1 => {
                if env::var(CONNECTION_STRING_ENV).is_ok() {
                    msg_warning!(Message::ConnectionStringFromEnv);
                }
                let default = match &current.backend {
                    BackendConfig::Mssql { connection_string } => connection_string.clone(),
                    _ => String::new(),
                };
                let required = Message::ValidationFailed("Please enter the connection string.".to_string()).to_string();
                let connection_string: String = Input::with_theme(&theme)
                    .with_prompt(Message::PromptConnectionString.to_string())
                    .default(default)
                    .validate_with(|input: &String| -> std::result::Result<(), &str> {
                        if input.trim().is_empty() {
                            Err(&required)
                        } else {
                            Ok(())
                        }
                    })
                    .interact_text()?;
                BackendConfig::Mssql {
                    connection_string: connection_string.trim().to_string(),
                }
            }
            _ => {
                let default = match &current.backend {
                    BackendConfig::Files { dir: Some(dir) } => dir.display().to_string(),
                    _ => String::new(),
                };
                let dir: String = Input::with_theme(&theme)
                    .with_prompt(Message::PromptDataDir.to_string())
                    .default(default)
                    .allow_empty(true)
                    .interact_text()?;
                BackendConfig::Files { dir: optional_path(&dir) }
            }
        };

        let policies = [Message::DeletePolicyBackendDefault.to_string(), "Block the delete".to_string(), "Delete their appointments too".to_string()];
        let default_policy = match current.delete_policy {
            None => 0,
            Some(DeletePolicy::Block) => 1,
            Some(DeletePolicy::Cascade) => 2,
        };
        let delete_policy = match Select::with_theme(&theme)
            .with_prompt(Message::PromptDeletePolicy.to_string())
            .items(&policies)
            .default(default_policy)
            .interact()?
        {
            1 => Some(DeletePolicy::Block),
            2 => Some(DeletePolicy::Cascade),
            _ => None,
        };

        Ok(Config { backend, delete_policy })
    }
}

fn optional_path(input: &str) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        None
    } else {
        Some(PathBuf::from(input))
    }
}
