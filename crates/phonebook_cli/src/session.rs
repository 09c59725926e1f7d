//! Interactive read-loop over a [`ContactStore`].
//!
//! # Responsibility
//! - Parse one command per line and prompt for its arguments.
//! - Turn store results into user-facing messages.
//!
//! # Invariants
//! - Only I/O errors on the terminal end the loop early; store errors are
//!   reported and the loop continues.
//! - The store is closed exactly once, on `exit` or end of input.

use log::{debug, warn};
use phonebook_core::{Contact, ContactStore, StoreError};
use std::io::{self, BufRead, Write};

const OPTIONS_LINE: &str = "Options: add, remove, show, reset, exit";
const LIST_HEADER: &str = "Contact List (sorted by Last Name and then First Name):";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Add,
    Remove,
    Show,
    Reset,
    Exit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            "show" => Some(Self::Show),
            "reset" => Some(Self::Reset),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Runs the menu loop until `exit` or end of input, then closes `store`.
pub fn run_session<R: BufRead, W: Write>(
    mut store: ContactStore,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    loop {
        writeln!(output)?;
        writeln!(output, "{OPTIONS_LINE}")?;
        let Some(choice) = prompt(&mut input, &mut output, "Choose an option: ")? else {
            break;
        };

        let Some(command) = Command::parse(&choice) else {
            writeln!(output, "Invalid option, please try again.")?;
            continue;
        };
        debug!("event=command module=cli command={command:?}");

        let handled = match command {
            Command::Add => add(&store, &mut input, &mut output)?,
            Command::Remove => remove(&store, &mut input, &mut output)?,
            Command::Show => show(&store, &mut output).map(|()| true)?,
            Command::Reset => reset(&mut store, &mut output).map(|()| true)?,
            Command::Exit => false,
        };
        if !handled {
            break;
        }
    }

    if let Err(err) = store.close() {
        warn!("event=store_close module=cli status=error error={err}");
        writeln!(output, "Error closing database: {err}")?;
    }
    writeln!(output, "Goodbye!")?;
    output.flush()
}

/// Returns `Ok(false)` when input ended before all arguments were read.
fn add<R: BufRead, W: Write>(
    store: &ContactStore,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let Some(name) = prompt(input, output, "Enter name: ")? else {
        return Ok(false);
    };
    let Some(phone) = prompt(input, output, "Enter phone number: ")? else {
        return Ok(false);
    };

    match store.add(&name, &phone) {
        Ok(contact) => writeln!(output, "Added: {} - {}", contact.name, contact.phone)?,
        Err(StoreError::DuplicateName(name)) => {
            writeln!(output, "Error: The name '{name}' already exists.")?
        }
        Err(StoreError::Validation(err)) => writeln!(output, "Error: {err}.")?,
        Err(err) => writeln!(output, "Database error while adding contact: {err}")?,
    }
    Ok(true)
}

fn remove<R: BufRead, W: Write>(
    store: &ContactStore,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let Some(name) = prompt(input, output, "Enter name to remove: ")? else {
        return Ok(false);
    };

    match store.remove(&name) {
        Ok(_) => writeln!(output, "Removed: {name}")?,
        Err(StoreError::NotFound(name)) => writeln!(output, "Error: Name '{name}' not found.")?,
        Err(err) => writeln!(output, "Database error while removing contact: {err}")?,
    }
    Ok(true)
}

fn show<W: Write>(store: &ContactStore, output: &mut W) -> io::Result<()> {
    match store.list() {
        Ok(contacts) if contacts.is_empty() => writeln!(output, "No contacts found."),
        Ok(contacts) => write_listing(output, &contacts),
        Err(err) => writeln!(output, "Database error while displaying contacts: {err}"),
    }
}

fn write_listing<W: Write>(output: &mut W, contacts: &[Contact]) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "{LIST_HEADER}")?;
    for contact in contacts {
        writeln!(output, "{}", contact.mirror_line())?;
    }
    Ok(())
}

fn reset<W: Write>(store: &mut ContactStore, output: &mut W) -> io::Result<()> {
    match store.reset() {
        Ok(()) => writeln!(output, "Database has been reset."),
        Err(err) => writeln!(output, "Database error while resetting: {err}"),
    }
}

/// Prints `label`, reads one line and trims it. `None` means end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
