use checklist_rust::cli::commands;
use checklist_rust::cli::{Cli, Commands};
use checklist_rust::config::CliOverrides;
use checklist_rust::logging::init_logging;
use checklist_rust::ChecklistError;
use clap::Parser;
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
        // Don't exit, just continue without logging
    }

    let overrides = build_cli_overrides(&cli);

    let result = match cli.command {
        Commands::Init { force } => commands::init::execute(force, cli.json),
        Commands::Issue { command } => commands::issue::execute(&command, &overrides),
        Commands::Add(args) => commands::add::execute(&args, &overrides),
        Commands::List(args) => commands::list::execute(&args, &overrides),
        Commands::Show { id } => commands::show::execute(id, &overrides),
        Commands::Check(args) => commands::check::execute(&args, true, &overrides),
        Commands::Uncheck(args) => commands::check::execute(&args, false, &overrides),
        Commands::Update(args) => commands::update::execute(&args, &overrides),
        Commands::Remove(args) => commands::remove::execute(&args, &overrides),
        Commands::Search(args) => commands::search::execute(&args, &overrides),
        Commands::Activity(args) => commands::activity::execute(&args, &overrides),
        Commands::Recalc { issue } => commands::recalc::execute(&issue, &overrides),
        Commands::Config { command } => commands::config::execute(&command, &overrides),
        Commands::Completions { shell } => {
            commands::completions::execute(shell);
            Ok(())
        }
        Commands::Version => commands::version::execute(cli.json),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs JSON to stderr.
/// Otherwise, outputs a human-readable error with an optional suggestion.
fn handle_error(err: &ChecklistError, json_mode: bool) -> ! {
    let exit_code = err.exit_code();
    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = err.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        eprintln!("Error: {err}");
        if let Some(suggestion) = err.suggestion() {
            eprintln!("  {suggestion}");
        }
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> CliOverrides {
    CliOverrides {
        db: cli.db.clone(),
        actor: cli.actor.clone(),
        json: cli.json,
        lock_timeout: cli.lock_timeout,
    }
}
