//! rHomeTasks library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (models, recurrence and completion rules, storage adapters).

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod models;
pub mod storage;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Family { .. } => cli::commands::family::handle(&cli.command, cfg),
        Commands::Reminder { .. } => cli::commands::reminder::handle(&cli.command, cfg),
        Commands::Event { .. } => cli::commands::event::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Config is loaded once; --db / --backend only affect this invocation.
    let cfg = Config::load()?.with_overrides(cli.db.as_deref(), cli.backend)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cfg.log_level))
        .init();
    log::debug!(
        "backend {} (database {}, data dir {})",
        cfg.backend,
        cfg.database,
        cfg.data_dir
    );

    dispatch(&cli, &cfg)
}
