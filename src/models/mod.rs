pub mod completion_event;
pub mod family;
pub mod new_reminder;
pub mod patch;
pub mod recurrence;
pub mod reminder;

pub use completion_event::CompletionEvent;
pub use family::Family;
pub use new_reminder::{NewReminder, RecurrenceInput};
pub use patch::{FieldUpdate, ReminderPatch};
pub use recurrence::{RecurrencePattern, RecurrenceType};
pub use reminder::{CompletionState, Reminder};
