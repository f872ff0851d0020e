use super::services;
use crate::cli::parser::{Commands, FamilyCmd};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, print_json, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Family { action } = cmd else {
        return Ok(());
    };
    let families = services(cfg)?.families;

    match action {
        FamilyCmd::Add { name, members } => {
            let family = families.create(name, members)?;
            print_json(&family)?;
            success(format!("Family {} created", family.id));
        }
        FamilyCmd::List => {
            let all = families.list()?;
            if all.is_empty() {
                info("No families yet");
            }
            print_json(&all)?;
        }
        FamilyCmd::Show { id } => print_json(&families.get(id)?)?,
        FamilyCmd::Del { id } => {
            families.delete(id)?;
            success(format!("Family {} deleted", id));
        }
        FamilyCmd::AddMember { id, member } => {
            print_json(&families.add_member(id, member)?)?;
        }
        FamilyCmd::RemoveMember { id, member } => {
            print_json(&families.remove_member(id, member)?)?;
        }
    }

    Ok(())
}
