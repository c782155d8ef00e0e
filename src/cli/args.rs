use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::tasks::Status;

#[derive(Parser)]
#[command(name = "todoline")]
#[command(about = "A personal task tracker that reads tasks written in plain language")]
#[command(long_about = "todoline - a personal task tracker

Type a task the way you would say it. Deadlines and tags are picked out of
the text and the rest becomes the title.

QUICK START:
  todoline add \"Buy groceries for tomorrow #shopping\"
  todoline add \"dentist friday 3pm #health\"
  todoline list --tag work
  todoline done 3
  todoline                  Open the interactive task list

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  todoline <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output or 'json' for
    /// machine-readable output. Defaults to `general.default_output` from
    /// the configuration file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Database file to use instead of the configured one
    #[arg(long, global = true, env = "TODOLINE_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Command to run; the interactive task list opens when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task written in natural language
    ///
    /// Words starting with '#' become tags. A deadline is taken from the
    /// words after 'for', 'due', 'by' or 'on', or from any short run of
    /// words that reads as a date. Everything else is the title.
    ///
    /// # Examples
    ///
    ///   todoline add "Buy groceries for tomorrow #shopping"
    ///   todoline add "Submit report by next friday #work"
    ///   todoline add "dentist tomorrow 3pm #health"
    ///   todoline add call mom on sunday --description "ask about the trip"
    ///
    /// # Supported Dates
    ///
    ///   Words:     today, tomorrow, tonight, yesterday, next week
    ///   Weekdays:  friday, next monday, this saturday, last tuesday
    ///   Offsets:   in 3 days, 2 weeks from now, 1 month ago
    ///   Calendar:  dec 15, 15 december 2025, 12/25, 2025-12-25
    ///   Times:     3pm, 3:30 pm, 15:00, at 9am, noon, midnight
    #[command(alias = "a")]
    Add(AddArgs),

    /// List tasks, newest first
    ///
    /// # Examples
    ///
    ///   todoline list
    ///   todoline list --status doing
    ///   todoline list --tag work -o json
    #[command(alias = "ls")]
    List(ListArgs),

    /// Search titles, descriptions and tags
    ///
    /// The match is a case-insensitive substring.
    ///
    /// # Examples
    ///
    ///   todoline search report
    #[command(alias = "s")]
    Search {
        /// Text to look for
        query: String,
    },

    /// Show one task in detail
    Show {
        /// Task ID
        id: i64,
    },

    /// Set the status of a task, or advance it when no status is given
    ///
    /// Without a status the task moves Todo -> Doing -> Done -> Todo.
    ///
    /// # Examples
    ///
    ///   todoline status 4
    ///   todoline status 4 doing
    Status {
        /// Task ID
        id: i64,

        /// New status (todo, doing, done)
        status: Option<Status>,
    },

    /// Mark a task as done
    Done {
        /// Task ID
        id: i64,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task ID
        id: i64,
    },

    /// List tags in use with their task counts
    Tags,

    /// Open the interactive task list
    Tui,

    /// Generate shell completions
    ///
    /// Outputs the completion script for the given shell.
    ///
    /// Example: todoline completions bash > ~/.bash_completion.d/todoline
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Show installation instructions instead of the script
        #[arg(long, short = 'i')]
        install: bool,
    },
}

/// Arguments for `add`.
#[derive(Args)]
pub struct AddArgs {
    /// The task in natural language
    ///
    /// Several words may be given without quoting; they are joined with
    /// single spaces. Quote the text when it contains '#' tags.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Longer description stored with the task
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Only parse and show what would be created, don't actually create
    #[arg(long)]
    pub parse_only: bool,
}

impl AddArgs {
    /// The words of the task joined back into one line.
    #[must_use]
    pub fn line(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for `list`.
#[derive(Args, Default)]
pub struct ListArgs {
    /// Only tasks in this status (todo, doing, done)
    #[arg(long, short = 's')]
    pub status: Option<Status>,

    /// Only tasks carrying this tag
    #[arg(long, short = 't')]
    pub tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_command_opens_tui() {
        let cli = Cli::try_parse_from(["todoline"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_add_joins_words() {
        let cli =
            Cli::try_parse_from(["todoline", "add", "Buy", "milk", "tomorrow", "#shopping"]).unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.line(), "Buy milk tomorrow #shopping");
                assert!(!args.parse_only);
                assert!(args.description.is_none());
            },
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_cli_add_options() {
        let cli = Cli::try_parse_from([
            "todoline",
            "a",
            "Call mom on sunday",
            "--description",
            "ask about the trip",
            "--parse-only",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.line(), "Call mom on sunday");
                assert_eq!(args.description.as_deref(), Some("ask about the trip"));
                assert!(args.parse_only);
            },
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_cli_add_requires_text() {
        assert!(Cli::try_parse_from(["todoline", "add"]).is_err());
    }

    #[test]
    fn test_cli_list_filters() {
        let cli = Cli::try_parse_from(["todoline", "ls", "--status", "doing", "--tag", "work"])
            .unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.status, Some(Status::Doing));
                assert_eq!(args.tag.as_deref(), Some("work"));
            },
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_cli_status_optional_value() {
        let cli = Cli::try_parse_from(["todoline", "status", "4"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Status { id: 4, status: None })
        ));

        let cli = Cli::try_parse_from(["todoline", "status", "4", "done"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Status {
                id: 4,
                status: Some(Status::Done)
            })
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["todoline", "status", "4", "later"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["todoline", "tags", "-o", "json", "--db", "/tmp/t.db"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/t.db")));
        assert!(matches!(cli.command, Some(Commands::Tags)));
    }

    #[test]
    fn test_cli_completions_shell() {
        let cli = Cli::try_parse_from(["todoline", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions {
                shell: Shell::Zsh,
                install: false
            })
        ));
    }
}
