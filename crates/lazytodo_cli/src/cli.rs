//! Command-line surface.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lazytodo_core::Priority;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lazytodo")]
#[command(about = "Local todo list with due-date reminders")]
#[command(
    after_help = "Environment:\n  LAZYTODO_DB_PATH   Database file used when --db is not given"
)]
pub struct Cli {
    /// Configuration file; defaults to `lazytodo.toml` in the working directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Database file, overriding the environment and configuration.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the signed-in user.
    Whoami,
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Notify at the reminder hour on the due date.
        #[arg(long, default_value_t = false)]
        remind: bool,
    },
    List {
        /// Only open todos due on this date.
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    Show {
        id: String,
    },
    /// Change selected fields of a todo.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long, default_value_t = false)]
        clear_description: bool,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        #[arg(long, default_value_t = false)]
        clear_due: bool,
        #[arg(long)]
        remind: Option<bool>,
        #[arg(long)]
        completed: Option<bool>,
    },
    Toggle {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Run the daily due-today check once, now.
    Sweep,
    /// Stay in the foreground delivering reminders until interrupted.
    Watch {
        /// Upper bound on one sleep between checks.
        #[arg(long, default_value_t = 60)]
        max_sleep_secs: u64,
    },
}

impl Cli {
    /// Config file path, explicit or the default in the working directory.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(lazytodo_core::AppConfig::FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use chrono::NaiveDate;
    use clap::Parser;
    use lazytodo_core::Priority;

    #[test]
    fn parses_add_with_options() {
        let cli = Cli::try_parse_from([
            "lazytodo",
            "--db",
            "/tmp/x.sqlite3",
            "add",
            "Buy milk",
            "--priority",
            "high",
            "--due",
            "2024-01-01",
            "--remind",
        ])
        .unwrap();

        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/x.sqlite3")));
        match cli.command {
            Command::Add {
                title,
                priority,
                due,
                remind,
                description,
            } => {
                assert_eq!(title, "Buy milk");
                assert_eq!(priority, Priority::High);
                assert_eq!(due, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert!(remind);
                assert!(description.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_due_date() {
        assert!(Cli::try_parse_from(["lazytodo", "add", "x", "--due", "tomorrow"]).is_err());
    }

    #[test]
    fn update_due_and_clear_due_conflict() {
        let parsed = Cli::try_parse_from([
            "lazytodo",
            "update",
            "id-1",
            "--due",
            "2024-01-01",
            "--clear-due",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn default_config_path_is_in_working_directory() {
        let cli = Cli::try_parse_from(["lazytodo", "whoami"]).unwrap();
        assert_eq!(cli.config_path(), std::path::PathBuf::from("lazytodo.toml"));
    }
}
