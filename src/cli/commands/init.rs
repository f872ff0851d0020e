use crate::cli::parser::Cli;
use crate::config::{Backend, Config};
use crate::errors::AppResult;
use crate::storage::{FileStorage, SqliteStorage};
use crate::ui::messages::{info, success, warning};
use std::path::Path;

/// Handle the `init` command
///
/// This prepares:
///  - the configuration file (skipped with `--test`)
///  - the selected backend: SQLite schema and migrations, or the data
///    directory of the file backend
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    cfg.init_all(cli.test)?;

    if !cli.test {
        info(format!("Config file : {}", Config::config_file().display()));
    }
    info(format!("Backend     : {}", cfg.backend));

    match cfg.backend {
        Backend::Sqlite => {
            let store = SqliteStorage::open(&cfg.database)?;
            let applied = store.applied_migrations()?;
            success(format!(
                "Database initialized at {} ({} migrations applied)",
                cfg.database,
                applied.len()
            ));
        }
        Backend::File => {
            FileStorage::open(Path::new(&cfg.data_dir))?;
            success(format!("Data directory initialized at {}", cfg.data_dir));
        }
        Backend::Memory => {
            warning("The memory backend keeps nothing between invocations");
        }
    }

    Ok(())
}
