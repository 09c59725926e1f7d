//! Interactive phonebook entry point.
//!
//! # Responsibility
//! - Resolve storage and log locations next to the executable.
//! - Open the contact store and hand it to the read-loop.
//!
//! # Invariants
//! - A store that cannot be opened ends the process with status 1.
//! - Logging failures are reported but never block the session.

mod session;

use log::error;
use phonebook_core::config::{executable_dir, log_dir_beside};
use phonebook_core::{default_log_level, init_logging, ContactStore, StorePaths};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let base_dir = match executable_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("Error: cannot locate program directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(default_log_level(), &log_dir_beside(&base_dir)) {
        eprintln!("Warning: logging disabled: {err}");
    }

    let paths = StorePaths::beside(&base_dir);
    let store = match ContactStore::with_paths(&paths) {
        Ok(store) => store,
        Err(err) => {
            error!("event=store_init module=cli status=error error={err}");
            println!("Database error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    match session::run_session(store, stdin.lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=session module=cli status=error error={err}");
            eprintln!("Error: terminal I/O failed: {err}");
            ExitCode::FAILURE
        }
    }
}
