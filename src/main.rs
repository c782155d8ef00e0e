use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use todoline::cli::args::{Cli, Commands};
use todoline::cli::commands;
use todoline::config::{Config, Paths};
use todoline::core::NaturalDateResolver;
use todoline::features::nlp::CommandParser;
use todoline::storage::TaskStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {e:#}", "error".red().bold());
        std::process::exit(1);
    }
}

/// Send diagnostics to the log file so they never mix with command output.
fn init_logging(paths: &Paths, config: &Config) -> Result<()> {
    paths.ensure_dirs()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_file)
        .with_context(|| format!("Failed to open log file {}", paths.log_file.display()))?;

    let filter = EnvFilter::try_from_env("TODOLINE_LOG")
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Completions need neither config nor database
    if let Some(Commands::Completions { shell, install }) = cli.command {
        println!("{}", commands::completions(shell, install)?);
        return Ok(());
    }

    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();
    init_logging(&paths, &config)?;

    let format = cli.output.unwrap_or(config.general.default_output);
    let db_path = config.database_path(&paths, cli.db.as_deref());
    tracing::debug!(db = %db_path.display(), ?format, "starting");
    let mut store = TaskStore::open(&db_path)?;

    let now = Local::now().naive_local();
    let parser = CommandParser::new(NaturalDateResolver::anchored(now));

    let output = match cli.command {
        Some(Commands::Add(args)) => commands::add(&mut store, &parser, args, format, now)?,
        Some(Commands::List(args)) => commands::list(&store, args, format, now)?,
        Some(Commands::Search { query }) => commands::search(&store, &query, format, now)?,
        Some(Commands::Show { id }) => commands::show(&store, id, format, now)?,
        Some(Commands::Status { id, status }) => {
            commands::status(&store, id, status, format, now)?
        },
        Some(Commands::Done { id }) => commands::done(&store, id, format, now)?,
        Some(Commands::Delete { id }) => commands::delete(&store, id, format)?,
        Some(Commands::Tags) => commands::tags(&store, format)?,
        Some(Commands::Completions { shell, install }) => commands::completions(shell, install)?,
        Some(Commands::Tui) | None => {
            todoline::tui::run(&mut store)?;
            String::new()
        },
    };

    if !output.is_empty() {
        println!("{}", output.trim_end());
    }
    Ok(())
}
