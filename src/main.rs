use anyhow::Context;
use clap::Parser;
use snag::config::Cli;
use snag::executor::CaptureEngine;
use snag::ui::{interrupt_banner, startup_banner, FileLog, Reporter};
use snag::{CancellationToken, Config, Watcher};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status after Ctrl+C
const EXIT_INTERRUPTED: u8 = 1;
/// Exit status for invalid switches or a failed startup
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Convert CLI args to Config - this validates immediately
    let config = match Config::try_from(cli) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            println!("Exiting the program.");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match run(config) {
        Ok(()) => {
            println!("{}", interrupt_banner());
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    {
        let token = token.clone();
        ctrlc::set_handler(move || token.cancel())
            .context("Failed to install Ctrl+C handler")?;
    }

    let reporter = if config.log {
        let log = FileLog::create(&config.destination, &command_line()).with_context(|| {
            format!(
                "Failed to create log file in {}",
                config.destination.display()
            )
        })?;
        tracing::debug!("logging to {}", log.path().display());
        Reporter::with_sink(log)
    } else {
        Reporter::new()
    };

    let engine = CaptureEngine::from_config(&config);
    let mut watcher = Watcher::new(config, engine, reporter)
        .context("Failed to read the source directory")?;

    println!("{}", startup_banner());
    watcher.run(&token)?;
    Ok(())
}

fn command_line() -> String {
    std::env::args().collect::<Vec<_>>().join(" ")
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "snag=debug" } else { "snag=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
