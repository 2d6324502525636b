//! `lazytodo` command-line entry point.
//!
//! # Responsibility
//! - Load configuration, initialize logging and open the store once.
//! - Dispatch one command, or run the foreground reminder loop.
//! - Close the store explicitly before exit.

mod cli;
mod commands;
mod notifier;
mod watch;

use clap::Parser;
use cli::{Cli, Command};
use lazytodo_core::{init_logging, AppConfig, AppContext, SystemClock};
use log::error;
use notifier::ConsoleNotifier;
use std::process::ExitCode;
use std::time::Duration;

const STDERR_LOG_LEVEL: &str = "warn";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load_or_default(&cli.config_path()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error[config]: {err}");
            return ExitCode::FAILURE;
        }
    };

    let log_dir = config.logging.dir.as_ref().and_then(|dir| dir.to_str());
    let level = if log_dir.is_some() {
        config.logging.level.as_str()
    } else {
        STDERR_LOG_LEVEL
    };
    if let Err(err) = init_logging(level, log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let ctx = match AppContext::open(config, cli.db.as_deref()) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("event=app_open module=cli status=error");
            eprintln!("error[db]: {err}");
            return ExitCode::FAILURE;
        }
    };
    let notifier = ConsoleNotifier::stdout(ctx.config().reminders.permission);

    let ok = match cli.command {
        Command::Watch { max_sleep_secs } => {
            let max_sleep = Duration::from_secs(max_sleep_secs.max(1));
            match watch::run_watch(&ctx, SystemClock, &notifier, max_sleep) {
                Ok(Ok(())) => true,
                Ok(Err(err)) => {
                    eprintln!("error[{}]: {err}", err.code());
                    false
                }
                Err(err) => {
                    eprintln!("error[runtime]: {err}");
                    false
                }
            }
        }
        command => {
            let output = commands::execute(&ctx, command, SystemClock, &notifier);
            for line in &output.lines {
                println!("{line}");
            }
            println!("{}", output.status_line());
            output.response.ok
        }
    };

    if let Err(err) = ctx.close() {
        eprintln!("error[db]: {err}");
        return ExitCode::FAILURE;
    }
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
