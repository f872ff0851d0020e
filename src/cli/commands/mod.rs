pub mod config;
pub mod db;
pub mod event;
pub mod family;
pub mod init;
pub mod log;
pub mod reminder;

use crate::config::Config;
use crate::core::Services;
use crate::errors::AppResult;
use crate::storage::open_storage;

/// Open the configured backend and wire the operation layer over it.
pub(crate) fn services(cfg: &Config) -> AppResult<Services> {
    Ok(Services::new(open_storage(cfg)?))
}
