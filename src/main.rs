//! Doghouse CLI entry point.

use clap::Parser;
use doghouse::cli::commands::{self, fetch::FetchOptions};
use doghouse::cli::{Cli, Commands};
use doghouse::error::{Error, ErrorCode};
use doghouse::prompt::TerminalPrompter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(&e),
    };

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli, cli.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Print a clap error and map it onto our exit codes.
///
/// `--help` and `--version` exit 0; usage errors exit with the
/// invalid-argument code rather than clap's default of 2.
fn usage_exit(e: &clap::Error) -> ExitCode {
    use clap::error::ErrorKind;

    // Nothing useful to do if stdout/stderr is gone.
    let _ = e.print();

    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::from(ErrorCode::InvalidArgument.exit_code()),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,hyper_util=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let mut prompter = TerminalPrompter;

    match &cli.command {
        Commands::Save { folder, location } => {
            commands::save::execute(cli, folder.as_deref(), *location, &mut prompter, json)
        }
        Commands::Diff { folder } => commands::diff::execute(cli, folder.as_deref(), &mut prompter, json),
        Commands::Sync { location, config, yes } => commands::sync::execute(
            cli,
            location.as_deref(),
            config.as_deref(),
            *yes,
            &mut prompter,
            json,
        ),
        Commands::Configure => commands::configure::execute(cli, &mut prompter, json),
        Commands::List { config_type } => commands::list::execute(cli, config_type, &mut prompter, json),
        Commands::Fetch {
            kind,
            id,
            folder,
            overwrite,
            drop_on_decline,
        } => commands::fetch::execute(
            cli,
            kind,
            id,
            folder.as_deref(),
            FetchOptions {
                overwrite: *overwrite,
                drop_on_decline: *drop_on_decline,
            },
            &mut prompter,
            json,
        ),

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
