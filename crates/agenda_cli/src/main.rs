//! Interactive text-menu front end for the contact agenda.
//!
//! # Responsibility
//! - Parse startup flags, bootstrap logging and the store.
//! - Hand stdin/stdout to the menu loop.

mod menu;

use agenda_core::{init_logging, ContactService, ContactStore, LogLevel};
use clap::Parser;
use log::{error, info};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "agenda", version, about = "Local contact agenda")]
struct Cli {
    /// SQLite file holding the contact table (created when missing)
    #[arg(long, default_value = "agenda.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files; file logging is off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log verbosity (trace|debug|info|warn|error)
    #[arg(long, default_value_t = LogLevel::default_for_build())]
    log_level: LogLevel,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(cli.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let store = match ContactStore::open(&cli.db) {
        Ok(store) => store,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("cannot open {}: {err}", cli.db.display());
            return ExitCode::FAILURE;
        }
    };
    info!("event=cli_start module=cli status=ok");

    let service = ContactService::new(store);
    let stdin = io::stdin();
    let stdout = io::stdout();
    match menu::run(&service, stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_menu module=cli status=error error={err}");
            eprintln!("terminal error: {err}");
            ExitCode::FAILURE
        }
    }
}
