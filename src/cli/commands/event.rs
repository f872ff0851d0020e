use super::services;
use crate::cli::parser::{Commands, EventCmd};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{print_json, success};
use crate::utils::parse_optional_timestamp;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Event { action } = cmd else {
        return Ok(());
    };
    let events = services(cfg)?.events;

    match action {
        EventCmd::Add {
            reminder_id,
            completed_by,
            at,
        } => {
            let at = parse_optional_timestamp(at.as_deref())?;
            let event = events.create(reminder_id, completed_by, at)?;
            print_json(&event)?;
            success(format!("Completion event {} recorded", event.id));
        }
        EventCmd::List { reminder_id } => print_json(&events.list(reminder_id)?)?,
        EventCmd::Show { id } => print_json(&events.get(id)?)?,
        EventCmd::Del { id } => {
            events.delete(id)?;
            success(format!("Completion event {} deleted", id));
        }
    }

    Ok(())
}
