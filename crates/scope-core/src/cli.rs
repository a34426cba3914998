use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::datetime::YearMonth;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "scope",
    version,
    about = "Scope: task calendar client",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Path to scope.toml; overrides $SCOPE_CONFIG.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Server root, e.g. http://127.0.0.1:8000.
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print a month with its task markers and one day's tasks.
    Calendar(CalendarArgs),
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Checklist(ChecklistCommand),
    #[command(subcommand)]
    Project(ProjectCommand),
    #[command(subcommand)]
    Tag(TagCommand),
}

#[derive(Args, Debug, Clone)]
pub struct CalendarArgs {
    /// Month to show as YYYY-MM; defaults to the current month.
    #[arg(long = "month")]
    pub month: Option<YearMonth>,

    /// Day to list tasks for, as YYYY-MM-DD.
    #[arg(long = "select")]
    pub select: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Flip a task's completion flag.
    Toggle { id: u64 },
    Delete { id: u64 },
    Add {
        title: String,
        #[arg(long = "project")]
        project: Option<u64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ChecklistCommand {
    Add { task: u64, text: String },
    Toggle { id: u64 },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommand {
    Add {
        name: String,
        /// Project color as #RRGGBB.
        #[arg(long = "color", default_value = "#7C3AED")]
        color: String,
    },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TagCommand {
    Add {
        name: String,
        /// Tag color as #RRGGBB.
        #[arg(long = "color", default_value = "#7C3AED")]
        color: String,
    },
    Delete { id: u64 },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GlobalCli {
        GlobalCli::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn calendar_accepts_month_and_selection() {
        let cli = parse(&[
            "scope",
            "-vv",
            "calendar",
            "--month",
            "2024-03",
            "--select",
            "2024-03-15",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Calendar(args) = cli.command else {
            panic!("expected calendar command");
        };
        assert_eq!(args.month, YearMonth::new(2024, 3));
        assert_eq!(args.select.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn malformed_month_is_rejected() {
        assert!(GlobalCli::try_parse_from(["scope", "calendar", "--month", "2024-13"]).is_err());
    }

    #[test]
    fn month_beyond_calendar_range_is_rejected() {
        let err = GlobalCli::try_parse_from(["scope", "calendar", "--month", "300000-01"])
            .expect_err("year out of range");
        assert!(err.to_string().contains("300000-01"));
    }

    #[test]
    fn tag_add_defaults_color() {
        let cli = parse(&["scope", "tag", "add", "urgent"]);
        let Command::Tag(TagCommand::Add { name, color }) = cli.command else {
            panic!("expected tag add");
        };
        assert_eq!(name, "urgent");
        assert_eq!(color, "#7C3AED");
        let cli = parse(&["scope", "tag", "delete", "9"]);
        assert!(matches!(cli.command, Command::Tag(TagCommand::Delete { id: 9 })));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = parse(&[
            "scope",
            "task",
            "add",
            "Write report",
            "--project",
            "4",
            "--base-url",
            "http://example.test",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://example.test"));
        let Command::Task(TaskCommand::Add { title, project }) = cli.command else {
            panic!("expected task add");
        };
        assert_eq!(title, "Write report");
        assert_eq!(project, Some(4));
    }
}
