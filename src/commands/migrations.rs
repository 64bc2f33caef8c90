use crate::{
    db::{
        self,
        db::Db,
        migrations::{get_db_version, init_with_migrations, needs_migration, MigrationManager},
    },
    libs::{config::Config, data_storage::DataStorage, messages::Message},
    msg_info, msg_print, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Current and latest schema version
    Status,
    /// Applied migrations
    History,
    /// Apply pending migrations
    Run,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let config = Config::read()?;
    let Some(path) = db::sqlite_path(&config, &DataStorage::new())? else {
        msg_warning!(Message::MigrationsNotSupported(config.backend.name().to_string()));
        return Ok(());
    };
    let mut conn = Db::open_without_migrations(&path)?;

    match args.command {
        MigrationsCommand::Status => {
            let version = get_db_version(&conn)?;
            msg_print!(Message::DbVersion(version, MigrationManager::new().latest_version()));
            if needs_migration(&conn)? {
                msg_info!(Message::MigrationsFound((MigrationManager::new().latest_version() - version) as usize));
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let history = MigrationManager::new().get_migration_history(&conn)?;
            if history.is_empty() {
                msg_info!(Message::NoMigrationsApplied);
                return Ok(());
            }

            msg_print!(Message::MigrationHistoryHeader, true);
            for (version, name, applied_at) in history {
                println!("  v{}: {} (applied: {})", version, name, applied_at);
            }
        }
        MigrationsCommand::Run => {
            if needs_migration(&conn)? {
                init_with_migrations(&mut conn)?;
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
    }

    Ok(())
}
