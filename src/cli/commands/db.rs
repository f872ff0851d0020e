use crate::cli::parser::Commands;
use crate::config::{Backend, Config};
use crate::errors::AppResult;
use crate::storage::{CounterKind, SqliteStorage, open_storage, recalculate_counters};
use crate::ui::messages::{info, success, warning};
use std::collections::BTreeMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        recalc_counters,
        migrations,
    } = cmd
    else {
        return Ok(());
    };

    if !*recalc_counters && !*migrations {
        info("Nothing to do: use --recalc-counters or --migrations");
        return Ok(());
    }

    if *recalc_counters {
        let store = open_storage(cfg)?;
        recalculate_counters(store.as_ref())?;

        let mut counters = BTreeMap::new();
        for kind in CounterKind::ALL {
            counters.insert(kind.to_db_str(), store.get_counter(kind)?);
        }
        crate::ui::messages::print_json(&counters)?;
        success("Counters recalculated");
    }

    if *migrations {
        if cfg.backend == Backend::Sqlite {
            let store = SqliteStorage::open(&cfg.database)?;
            for version in store.applied_migrations()? {
                println!("{}", version);
            }
        } else {
            warning(format!("No schema migrations for the {} backend", cfg.backend));
        }
    }

    Ok(())
}
