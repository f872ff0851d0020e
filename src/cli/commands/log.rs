use crate::cli::parser::Commands;
use crate::config::{Backend, Config};
use crate::errors::AppResult;
use crate::storage::SqliteStorage;
use crate::ui::messages::{header, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print, limit } = cmd else {
        return Ok(());
    };
    if !*print {
        return Ok(());
    }

    if cfg.backend != Backend::Sqlite {
        warning(format!(
            "The internal log is only kept by the sqlite backend (current: {})",
            cfg.backend
        ));
        return Ok(());
    }

    let store = SqliteStorage::open(&cfg.database)?;
    let rows = store.recent_log(*limit)?;

    header("Internal log");
    let width = rows
        .iter()
        .map(|r| r.operation.len() + r.target.len() + 3)
        .max()
        .unwrap_or(0)
        .min(40);

    for row in rows.iter().rev() {
        let op_target = if row.target.is_empty() {
            row.operation.clone()
        } else {
            format!("{} ({})", row.operation, row.target)
        };
        println!("{:<25} {:<width$} {}", row.date, op_target, row.message, width = width);
    }

    Ok(())
}
