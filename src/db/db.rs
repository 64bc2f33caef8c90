use super::migrations::MigrationManager;
use crate::libs::error::Result;
use rusqlite::Connection;
use std::path::Path;

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database file and brings its schema up to date.
    pub fn open(path: &Path) -> Result<Db> {
        let mut conn = Self::open_without_migrations(path)?;
        MigrationManager::new().run_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// Opens the database file with foreign keys enabled but no migrations applied.
    pub fn open_without_migrations(path: &Path) -> Result<Connection> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;

        Ok(conn)
    }

    pub fn open_in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        MigrationManager::new().run_migrations(&mut conn)?;

        Ok(Db { conn })
    }
}
