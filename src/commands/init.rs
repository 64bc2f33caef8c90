use crate::{
    db,
    libs::{config::Config, messages::Message},
    msg_error, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Save without opening the store
    #[arg(long)]
    no_check: bool,
}

pub fn cmd(args: InitArgs) -> Result<()> {
    let config = Config::init()?;
    let path = config.save()?;
    msg_success!(Message::ConfigSaved(path.display().to_string()));

    if args.no_check {
        return Ok(());
    }

    // Opening provisions the schema and the reference records
    match db::open(&config) {
        Ok(store) => msg_info!(Message::CurrentBackend(format!("{} (delete policy: {})", store.backend_name(), store.delete_policy()))),
        Err(e) => msg_error!(Message::StoreUnavailable(e.to_string())),
    }
    Ok(())
}
