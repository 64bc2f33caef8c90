//! Versioned schema management for the SQLite store.
//!
//! Each migration runs once, in version order, and is recorded in the
//! `migrations` table. All pending migrations are applied inside a single
//! transaction, so a failure leaves the database at its previous version.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use medapp::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("medapp.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), medapp::libs::error::ClinicError>(())
//! ```

use super::seed::{SEED_DOCTORS, SEED_PATIENTS};
use crate::libs::error::Result;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info};
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all schema migrations, in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: entity tables. AUTOINCREMENT keeps IDs from being reused
        // after the newest row is deleted.
        self.add_migration(1, "create_clinic_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS doctors (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    full_name TEXT NOT NULL,
                    specialty TEXT NOT NULL,
                    available BOOLEAN NOT NULL DEFAULT 1,
                    phone TEXT
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS patients (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    full_name TEXT NOT NULL,
                    email TEXT NOT NULL
                )",
                [],
            )?;

            // No ON DELETE action: dependents are handled by the store's delete policy
            tx.execute(
                "CREATE TABLE IF NOT EXISTS appointments (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    doctor_id INTEGER NOT NULL REFERENCES doctors(id),
                    patient_id INTEGER NOT NULL REFERENCES patients(id),
                    date TIMESTAMP NOT NULL,
                    notes TEXT
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_appointments_doctor_id ON appointments(doctor_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(date)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_doctors_available ON doctors(available)", [])?;

            Ok(())
        });

        // Version 2: reference doctors and patients
        self.add_migration(2, "seed_reference_data", |tx| {
            for (i, (full_name, specialty, available, phone)) in SEED_DOCTORS.iter().enumerate() {
                tx.execute(
                    "INSERT OR IGNORE INTO doctors (id, full_name, specialty, available, phone) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![i as i32 + 1, full_name, specialty, available, phone],
                )?;
            }
            for (i, (full_name, email)) in SEED_PATIENTS.iter().enumerate() {
                tx.execute(
                    "INSERT OR IGNORE INTO patients (id, full_name, email) VALUES (?1, ?2, ?3)",
                    params![i as i32 + 1, full_name, email],
                )?;
            }
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded version.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_info!(Message::DatabaseReady);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        // A missing migrations table means version 0
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        if !has_migrations_table(conn)? {
            return Ok(false);
        }

        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// (version, name, applied_at) for every applied migration.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        if !has_migrations_table(conn)? {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A database that was never migrated has no `migrations` table yet.
fn has_migrations_table(conn: &Connection) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'migrations'",
        [],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
