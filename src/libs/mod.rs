//! Entities, forms and the ambient pieces shared by the commands.

pub mod appointment;
pub mod config;
pub mod data_storage;
pub mod doctor;
pub mod error;
pub mod export;
pub mod formatter;
pub mod messages;
pub mod patient;
pub mod validation;
pub mod view;
