use super::services;
use crate::cli::parser::{Commands, ReminderCmd};
use crate::config::Config;
use crate::core::ReminderFilter;
use crate::core::patch::parse_patch;
use crate::errors::{AppError, AppResult};
use crate::models::{NewReminder, RecurrenceInput, ReminderPatch};
use crate::ui::messages::{info, print_json, success};
use crate::utils::date::{format_timestamp, parse_date};
use crate::utils::{parse_optional_timestamp, today};
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Reminder { action } = cmd else {
        return Ok(());
    };
    let reminders = services(cfg)?.reminders;

    match action {
        ReminderCmd::Add {
            title,
            description,
            due,
            family,
            member,
            recurrence,
            days,
            date,
            end_date,
        } => {
            let req = NewReminder {
                title: title.clone(),
                description: description.clone(),
                due_date: due.clone(),
                family_id: family.clone(),
                family_member: member.clone(),
                recurrence: RecurrenceInput {
                    kind: recurrence.clone(),
                    days: days.clone(),
                    date: *date,
                    end_date: end_date.clone(),
                },
            };
            let reminder = reminders.create(&req)?;
            print_json(&reminder)?;
            success(format!("Reminder {} created", reminder.id));
        }

        ReminderCmd::List {
            today: only_today,
            on,
            family,
            member,
            pending,
        } => {
            let filter = ReminderFilter {
                family_id: family.clone(),
                family_member: member.clone(),
                pending_only: *pending,
            };

            let day = match on {
                Some(s) => Some(parse_date(s).ok_or_else(|| {
                    AppError::InvalidDate(format!("expected YYYY-MM-DD, got '{}'", s))
                })?),
                None if *only_today => Some(today()),
                None => None,
            };

            let list = match day {
                Some(d) => reminders.list_due_on(d, &filter)?,
                None => reminders
                    .list()?
                    .into_iter()
                    .filter(|r| filter.matches(r))
                    .collect(),
            };
            if list.is_empty() {
                info("No reminders");
            }
            print_json(&list)?;
        }

        ReminderCmd::Show { id } => print_json(&reminders.get(id)?)?,

        ReminderCmd::Del { id } => {
            reminders.delete(id)?;
            success(format!("Reminder {} deleted", id));
        }

        ReminderCmd::Patch { id, body } => {
            let value: serde_json::Value = serde_json::from_str(body)
                .map_err(|e| AppError::InvalidPayload(format!("patch body is not JSON: {}", e)))?;
            let patch = parse_patch(&value)?;
            if patch.is_empty() {
                info("No applicable fields in patch");
            }
            print_json(&reminders.patch(id, &patch)?)?;
        }

        ReminderCmd::Done { id } => {
            print_json(&reminders.patch(id, &ReminderPatch::completion(true))?)?;
        }

        ReminderCmd::Undone { id } => {
            print_json(&reminders.patch(id, &ReminderPatch::completion(false))?)?;
        }

        ReminderCmd::Next { id, after, count } => {
            let after = parse_optional_timestamp(after.as_deref())?.unwrap_or_else(Local::now);
            let next: Vec<String> = reminders
                .upcoming(id, after, usize::from(*count))?
                .iter()
                .map(format_timestamp)
                .collect();
            if next.is_empty() {
                info(format!("Reminder {} has no further occurrences", id));
            }
            print_json(&next)?;
        }
    }

    Ok(())
}
