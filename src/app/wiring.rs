use anyhow::{Context, Result};

use crate::configuration::Configuration;
use crate::storage::SqliteStorage;

pub fn init_data_dir(config: &Configuration) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    Ok(())
}

pub fn init_storage(config: &Configuration) -> Result<SqliteStorage> {
    let db_path = config.data_dir.join("catalogue.sqlite");
    let sqlite = SqliteStorage::new(&db_path);
    if config.reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}
