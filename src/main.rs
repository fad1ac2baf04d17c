//! kernup - Ubuntu mainline kernel installer CLI tool
//!
//! Lists recent mainline kernel builds, asks which one to install,
//! downloads its packages and installs them with dpkg.

use clap::Parser;
use kernup::cli::CliArgs;
use kernup::config::Settings;
use kernup::logging::{init_logging, Verbosity};
use kernup::orchestrator::{Orchestrator, RunOptions, RunOutcome};
use kernup::output::{failure_line, success_line};
use kernup::staging::StagingGuard;
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(Verbosity::from_flags(args.verbose, args.quiet));
    if args.no_color {
        colored::control::set_override(false);
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{}", failure_line(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let settings = Settings::from_cli(&args)?;
    let options = RunOptions::from_cli(&args);

    tracing::debug!(?settings, "settings resolved");

    // Staging files are removed on every exit path, Ctrl+C included
    let guard = StagingGuard::acquire(settings.staging_root.clone())?;
    guard.release_on_interrupt()?;

    let orchestrator = Orchestrator::new(settings, options)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout().lock();
    let outcome = orchestrator.run(&mut input, &mut stdout).await;
    stdout.flush()?;
    drop(stdout);

    guard.release();

    if let RunOutcome::Installed(_) = outcome? {
        println!("{}", success_line());
    }
    Ok(ExitCode::SUCCESS)
}
