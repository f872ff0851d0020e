use crate::config::Backend;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rHomeTasks
/// Household reminders shared by family members
#[derive(Parser)]
#[command(
    name = "rhometasks",
    version = env!("CARGO_PKG_VERSION"),
    about = "A household task tracker: families, recurring reminders and completion history",
    long_about = None
)]
pub struct Cli {
    /// Override the storage location (SQLite file, or data directory with --backend file)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the configured storage backend
    #[arg(global = true, long = "backend", value_enum)]
    pub backend: Option<Backend>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the storage backend
    Init,

    /// Show the effective configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Manage families and their members
    Family {
        #[command(subcommand)]
        action: FamilyCmd,
    },

    /// Manage reminders
    Reminder {
        #[command(subcommand)]
        action: ReminderCmd,
    },

    /// Manage completion events
    Event {
        #[command(subcommand)]
        action: EventCmd,
    },

    /// Print the internal log table (sqlite backend)
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", default_value_t = 50, help = "Maximum number of rows")]
        limit: usize,
    },

    /// Storage maintenance
    Db {
        #[arg(
            long = "recalc-counters",
            help = "Raise the id counters to the highest ids present in the data"
        )]
        recalc_counters: bool,

        #[arg(long = "migrations", help = "List applied schema migrations (sqlite backend)")]
        migrations: bool,
    },
}

#[derive(Subcommand)]
pub enum FamilyCmd {
    /// Create a family
    Add {
        name: String,

        /// Member name (repeatable)
        #[arg(long = "member", short = 'm')]
        members: Vec<String>,
    },
    /// List all families
    List,
    /// Show one family
    Show { id: String },
    /// Delete a family
    Del { id: String },
    /// Add a member to a family
    AddMember { id: String, member: String },
    /// Remove a member from a family
    RemoveMember { id: String, member: String },
}

#[derive(Subcommand)]
pub enum ReminderCmd {
    /// Create a reminder
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Due date (RFC 3339); for recurring reminders only its time of day is used
        #[arg(long = "due")]
        due: Option<String>,

        #[arg(long = "family")]
        family: String,

        #[arg(long = "member")]
        member: String,

        /// once, daily, weekly or monthly (default: once)
        #[arg(long = "recurrence", default_value = "")]
        recurrence: String,

        /// Weekday names for weekly reminders (comma separated)
        #[arg(long = "days", value_delimiter = ',')]
        days: Vec<String>,

        /// Day of month for monthly reminders (1-31)
        #[arg(long = "date", allow_negative_numbers = true)]
        date: Option<i64>,

        /// Last instant the recurrence applies (RFC 3339)
        #[arg(long = "end-date")]
        end_date: Option<String>,
    },
    /// List reminders, optionally only those due on a day
    List {
        #[arg(long = "today", group = "day", help = "Only reminders due today")]
        today: bool,

        #[arg(
            long = "on",
            group = "day",
            value_name = "YYYY-MM-DD",
            help = "Only reminders due on this day"
        )]
        on: Option<String>,

        #[arg(long = "family")]
        family: Option<String>,

        #[arg(long = "member")]
        member: Option<String>,

        #[arg(
            long = "pending",
            requires = "day",
            help = "Hide occurrences already done that day (needs --today or --on)"
        )]
        pending: bool,
    },
    /// Show one reminder
    Show { id: String },
    /// Delete a reminder
    Del { id: String },
    /// Apply a sparse JSON update, e.g. '{"completed":true}'
    Patch { id: String, body: String },
    /// Mark a reminder (or today's occurrence) complete
    Done { id: String },
    /// Clear a reminder's completion
    Undone { id: String },
    /// Show the next occurrence(s)
    Next {
        id: String,

        /// Reference instant (RFC 3339, default: now)
        #[arg(long = "after")]
        after: Option<String>,

        #[arg(
            long = "count",
            default_value_t = 1,
            value_parser = clap::value_parser!(u16).range(1..=1000),
            help = "Number of occurrences to show (1-1000)"
        )]
        count: u16,
    },
}

#[derive(Subcommand)]
pub enum EventCmd {
    /// Record a completion event directly
    Add {
        reminder_id: String,
        completed_by: String,

        /// Completion instant (RFC 3339, default: now)
        #[arg(long = "at")]
        at: Option<String>,
    },
    /// List the completion events of a reminder
    List { reminder_id: String },
    /// Show one completion event
    Show { id: String },
    /// Delete a completion event
    Del { id: String },
}
