//! Numbered text menu over the contact service.
//!
//! Options: 1 add, 2 list, 3 delete, 4 exact search, 5 partial search,
//! 6 modify, 7 exit. End of input behaves like 7.

use agenda_core::{Agenda, Contact, ContactId, ContactService, ServiceError};
use std::io::{self, BufRead, Write};

/// One parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    List,
    Delete,
    SearchExact,
    SearchPartial,
    Modify,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::List),
            "3" => Some(Self::Delete),
            "4" => Some(Self::SearchExact),
            "5" => Some(Self::SearchPartial),
            "6" => Some(Self::Modify),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

const MENU_TEXT: &str = "\n1) Add contact\n2) List contacts\n3) Delete contact\n\
4) Search by exact name\n5) Search by partial name\n6) Modify contact\n7) Exit\n";

// Typed in the modify form to clear the email.
const CLEAR_MARKER: &str = "-";

/// Runs the menu until the user exits or input ends.
pub fn run<R: BufRead, W: Write>(
    service: &ContactService,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    loop {
        write!(output, "{MENU_TEXT}> ")?;
        output.flush()?;

        let Some(line) = read_line(&mut input)? else {
            return Ok(());
        };
        let Some(choice) = MenuChoice::parse(&line) else {
            writeln!(output, "unknown option, choose 1-7")?;
            continue;
        };

        match choice {
            MenuChoice::Add => add_contact(service, &mut input, &mut output)?,
            MenuChoice::List => print_contacts(&mut output, service.list(None).iter())?,
            MenuChoice::Delete => delete_contact(service, &mut input, &mut output)?,
            MenuChoice::SearchExact => {
                let Some(name) = prompt(&mut input, &mut output, "Name: ")? else {
                    return Ok(());
                };
                let agenda = Agenda::from(service.list(None));
                print_contacts(&mut output, agenda.find_exact(&name).into_iter())?;
            }
            MenuChoice::SearchPartial => {
                let Some(text) = prompt(&mut input, &mut output, "Text: ")? else {
                    return Ok(());
                };
                let agenda = Agenda::from(service.list(None));
                print_contacts(&mut output, agenda.find_partial(&text).into_iter())?;
            }
            MenuChoice::Modify => modify_contact(service, &mut input, &mut output)?,
            MenuChoice::Exit => return Ok(()),
        }
    }
}

fn add_contact<R: BufRead, W: Write>(
    service: &ContactService,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(name) = prompt(input, output, "Name: ")? else {
        return Ok(());
    };
    let Some(phone) = prompt(input, output, "Phone: ")? else {
        return Ok(());
    };
    let Some(email) = prompt(input, output, "Email (optional): ")? else {
        return Ok(());
    };

    match service.create(&name, &phone, &email) {
        Ok(id) => writeln!(output, "contact saved (id {id})"),
        Err(err) => writeln!(output, "{err}"),
    }
}

fn delete_contact<R: BufRead, W: Write>(
    service: &ContactService,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(id) = prompt_id(input, output)? else {
        return Ok(());
    };
    match service.delete(id) {
        Ok(()) => writeln!(output, "contact deleted"),
        Err(err) => writeln!(output, "{err}"),
    }
}

fn modify_contact<R: BufRead, W: Write>(
    service: &ContactService,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(id) = prompt_id(input, output)? else {
        return Ok(());
    };
    let Some(current) = service.get(id) else {
        return writeln!(output, "{}", ServiceError::NotFound(id));
    };
    writeln!(output, "{current}")?;
    writeln!(output, "leave blank to keep, `{CLEAR_MARKER}` clears the email")?;

    let Some(name) = prompt(input, output, "Name: ")? else {
        return Ok(());
    };
    let Some(phone) = prompt(input, output, "Phone: ")? else {
        return Ok(());
    };
    let Some(email) = prompt(input, output, "Email: ")? else {
        return Ok(());
    };

    let name = keep_if_blank(&name, &current.name);
    let phone = keep_if_blank(&phone, &current.phone);
    let email = match email.trim() {
        CLEAR_MARKER => "",
        "" => current.email.as_deref().unwrap_or(""),
        other => other,
    };

    match service.update(id, name, phone, email) {
        Ok(()) => writeln!(output, "contact updated"),
        Err(err) => writeln!(output, "{err}"),
    }
}

fn print_contacts<'a, W: Write>(
    output: &mut W,
    contacts: impl Iterator<Item = &'a Contact>,
) -> io::Result<()> {
    let mut printed = 0_usize;
    for contact in contacts {
        writeln!(output, "{contact}")?;
        printed += 1;
    }
    if printed == 0 {
        writeln!(output, "no contacts found")?;
    }
    Ok(())
}

fn keep_if_blank<'a>(value: &'a str, current: &'a str) -> &'a str {
    if value.trim().is_empty() {
        current
    } else {
        value
    }
}

fn prompt_id<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<ContactId>> {
    loop {
        let Some(raw) = prompt(input, output, "Id: ")? else {
            return Ok(None);
        };
        match raw.trim().parse::<ContactId>() {
            Ok(id) => return Ok(Some(id)),
            Err(_) => writeln!(output, "id must be a number")?,
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;
    read_line(input)
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
