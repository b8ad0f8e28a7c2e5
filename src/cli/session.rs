//! Running commands against an address book.

use std::io::{self, Write};

use chrono::{Local, NaiveDate};
use dialoguer::{BasicHistory, Confirm, Input, theme::ColorfulTheme};
use keeper::{
    AddressBook, BookError, Config, Record, RecordError, Store,
    domain::{EditableField, Field, Name, Note, Phone, Tag, ValidationError},
    storage::SaveError,
};
use tracing::instrument;

use super::{
    command::{self, Action, USAGE},
    completion::Completer,
    table,
    terminal::{self, Colorize},
};

/// How questions that need a yes or no are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Ask on the terminal.
    Prompt,
    /// Answer yes without asking.
    AssumeYes,
    /// Answer no without asking.
    Refuse,
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Book(#[from] BookError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("failed to read input: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl From<RecordError> for SessionError {
    fn from(error: RecordError) -> Self {
        Self::Book(error.into())
    }
}

impl From<ValidationError> for SessionError {
    fn from(error: ValidationError) -> Self {
        Self::Book(error.into())
    }
}

/// An address book, the file it lives in, and somewhere to write results.
pub struct Session<W> {
    book: AddressBook,
    store: Store,
    config: Config,
    confirmation: Confirmation,
    today: Option<NaiveDate>,
    out: W,
}

impl<W: Write> Session<W> {
    pub const fn new(
        book: AddressBook,
        store: Store,
        config: Config,
        confirmation: Confirmation,
        out: W,
    ) -> Self {
        Self {
            book,
            store,
            config,
            confirmation,
            today: None,
            out,
        }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Runs one action, saving the address book if the action can change it.
    ///
    /// # Errors
    ///
    /// Returns an error if the action is rejected, or if the result cannot be
    /// saved or written.
    pub fn execute(&mut self, action: Action) -> Result<Flow, SessionError> {
        let mutating = action.is_mutating();
        let flow = self.dispatch(action)?;
        if mutating {
            self.store.save(&self.book)?;
        }
        Ok(flow)
    }

    /// Reads and runs commands until the user leaves.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written. Rejected
    /// commands are reported and the session continues.
    pub fn run(&mut self) -> Result<(), SessionError> {
        self.greet()?;
        self.help()?;
        writeln!(
            self.out,
            "\nAddress book has {} contact(s).\n",
            self.book.len()
        )?;

        let theme = ColorfulTheme::default();
        let mut history = BasicHistory::new()
            .max_entries(self.config.history_size())
            .no_duplicates(true);

        loop {
            let completer = Completer::new(self.book.names());
            let line = match Input::<String>::with_theme(&theme)
                .with_prompt("keeper")
                .allow_empty(true)
                .completion_with(&completer)
                .history_with(&mut history)
                .interact_text()
            {
                Ok(line) => line,
                Err(dialoguer::Error::IO(e))
                    if matches!(
                        e.kind(),
                        io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
                    ) =>
                {
                    self.farewell()?;
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            let action = match command::parse(&line) {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(e) => {
                    self.error(&e.to_string())?;
                    continue;
                }
            };

            match self.execute(action) {
                Ok(Flow::Exit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(SessionError::Book(e)) => self.error(&e.to_string())?,
                Err(SessionError::Save(e)) => {
                    tracing::warn!("{e}");
                    self.error(&format!("Changes were not saved: {e}"))?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn greet(&mut self) -> Result<(), SessionError> {
        if let Some(owner) = self.book.get_owner() {
            let message = format!("Glad to see you, {}!", owner.name());
            return self.info(&message);
        }

        writeln!(self.out, "Let's start by recording your personal details.")?;
        let theme = ColorfulTheme::default();
        if !Confirm::with_theme(&theme)
            .with_prompt("Record your details now?")
            .default(true)
            .interact()?
        {
            return Ok(());
        }

        let name: String = Input::with_theme(&theme)
            .with_prompt("Your name")
            .validate_with(|input: &String| {
                Name::parse(input).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()?;
        let phone: String = Input::with_theme(&theme)
            .with_prompt("Your phone (optional)")
            .allow_empty(true)
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Ok(())
                } else {
                    Phone::parse(input).map(|_| ()).map_err(|e| e.to_string())
                }
            })
            .interact_text()?;

        if self.book.find_contact(&name).is_none() {
            self.book.add_record(Record::new(&name)?);
        }
        if !phone.trim().is_empty() {
            let record = self.book.contact_mut(&name)?;
            if record.find_phone(&phone).is_none() {
                record.add_phone(&phone)?;
            }
        }
        self.book.set_owner(&name)?;
        self.store.save(&self.book)?;

        tracing::info!(owner = name.trim(), "Recorded owner");
        self.success(&format!("Welcome, {}!", name.trim()))
    }

    fn farewell(&mut self) -> Result<(), SessionError> {
        let message = match self.book.get_owner() {
            Some(owner) => format!("Good bye, {}!", owner.name()),
            None => "Good bye!".to_string(),
        };
        self.warning(&message)
    }

    fn help(&mut self) -> Result<(), SessionError> {
        let width = USAGE
            .iter()
            .map(|usage| usage.synopsis().chars().count())
            .max()
            .unwrap_or(0);

        writeln!(self.out, "Available commands (tab to complete):")?;
        for usage in USAGE {
            let synopsis = format!("{:<width$}", usage.synopsis());
            writeln!(self.out, "  {}  {}", synopsis.success(), usage.about)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    #[instrument(level = "debug", skip(self))]
    fn dispatch(&mut self, action: Action) -> Result<Flow, SessionError> {
        match action {
            Action::Hello => {
                let message = match self.book.get_owner() {
                    Some(owner) => format!("Hi {}! How can I help you?", owner.name()),
                    None => "Hi! How can I help you?".to_string(),
                };
                self.success(&message)?;
            }
            Action::Help => self.help()?,
            Action::Exit => {
                self.farewell()?;
                return Ok(Flow::Exit);
            }

            Action::AddContact { name, phone } => self.add_contact(&name, phone.as_deref())?,
            Action::AddPhone { name, phone } => self.add_phone(&name, &phone)?,
            Action::AddEmail { name, email } => {
                self.book.contact_mut(&name)?.add_email(&email)?;
                self.success(&format!("Email for {} saved.", name.trim()))?;
            }
            Action::AddAddress { name, address } => {
                self.book.contact_mut(&name)?.add_address(&address)?;
                self.success(&format!("Address for {} saved.", name.trim()))?;
            }
            Action::AddBirthday { name, birthday } => {
                self.book.contact_mut(&name)?.add_birthday(&birthday)?;
                self.success(&format!("Birthday for {} saved.", name.trim()))?;
            }
            Action::AddNote { name, title, text } => {
                self.book
                    .contact_mut(&name)?
                    .add_note(&title, text.as_deref(), &[])?;
                self.success(&format!(
                    "Note '{}' added to {}.",
                    title.trim(),
                    name.trim()
                ))?;
            }
            Action::AddTags { name, title, tags } => self.add_tags(&name, &title, &tags)?,
            Action::SetOwner { name } => {
                self.book.set_owner(&name)?;
                self.success(&format!(
                    "{} is now the owner of this address book.",
                    name.trim()
                ))?;
            }

            Action::ShowAll => {
                if self.book.is_empty() {
                    self.info("No contacts found.")?;
                } else {
                    let table = contacts_table(&self.book.iter().collect::<Vec<_>>());
                    self.print(&table)?;
                }
            }
            Action::ShowContact { name } => {
                let text = self.book.contact(&name)?.to_string();
                self.print(&text)?;
            }
            Action::ShowPhones { name } => {
                let record = self.book.contact(&name)?;
                if record.phones().is_empty() {
                    let message = format!("No phone numbers recorded for {}.", record.name());
                    self.info(&message)?;
                } else {
                    let rows: Vec<Vec<String>> = record
                        .phones()
                        .iter()
                        .map(|phone| vec![record.name().to_string(), phone.to_string()])
                        .collect();
                    let table = table::render(&["Name", "Phone"], &rows, terminal::width());
                    self.print(&table)?;
                }
            }
            Action::ShowBirthday { name } => {
                let record = self.book.contact(&name)?;
                let birthday = record
                    .birthday()
                    .map_or_else(|| "not set".to_string(), ToString::to_string);
                let message = format!("{}'s birthday: {birthday}", record.name());
                self.print(&message)?;
            }
            Action::ShowBirthdays { days } => {
                self.show_birthdays(days.unwrap_or_else(|| self.config.upcoming_days()))?;
            }
            Action::ShowNotes { name } => {
                let record = self.book.contact(&name)?;
                if record.notes().is_empty() {
                    let message = format!("No notes for {}.", record.name());
                    self.info(&message)?;
                } else {
                    let notes: Vec<_> = record.notes().iter().map(|note| (record, note)).collect();
                    let table = notes_table(&notes);
                    self.print(&table)?;
                }
            }
            Action::ShowOwner => match self.book.get_owner() {
                Some(owner) => {
                    let text = owner.to_string();
                    self.print(&text)?;
                }
                None => self.info("No owner recorded yet. Use 'owner <name>' to set one.")?,
            },

            Action::EditInfo { name, field, value } => {
                self.book.edit_field(&name, field, &value)?;
                let message = if field == EditableField::Name {
                    format!("Contact {} renamed to {}.", name.trim(), value.trim())
                } else {
                    format!("Updated {field} for {}.", name.trim())
                };
                self.success(&message)?;
            }
            Action::EditPhone { name, old, new } => {
                self.book.contact_mut(&name)?.edit_phone(&old, &new)?;
                self.success(&format!("Phone number of {} updated.", name.trim()))?;
            }
            Action::EditNote {
                name,
                title,
                new_title,
                text,
            } => {
                self.book.contact_mut(&name)?.edit_note_by_title(
                    &title,
                    &new_title,
                    text.as_deref(),
                )?;
                self.success(&format!(
                    "Note '{}' of {} updated.",
                    title.trim(),
                    name.trim()
                ))?;
            }

            Action::DeleteContact { name } => {
                let removed = self.book.delete(&name)?;
                self.success(&format!("Contact {} deleted.", removed.name()))?;
            }
            Action::DeletePhone { name, phone } => {
                let removed = self
                    .book
                    .contact_mut(&name)?
                    .remove_phone(&phone)
                    .ok_or_else(|| RecordError::PhoneNotFound(phone.trim().to_string()))?;
                self.success(&format!(
                    "Phone number {removed} removed from {}.",
                    name.trim()
                ))?;
            }
            Action::DeleteInfo { name, field } => {
                if self.book.clear_field(&name, field)? {
                    self.success(&format!("Removed {field} from {}.", name.trim()))?;
                } else {
                    self.info(&format!("{} has no {field} to remove.", name.trim()))?;
                }
            }
            Action::DeleteNote { name, title } => {
                self.book
                    .contact_mut(&name)?
                    .remove_note_by_title(&title)
                    .ok_or_else(|| RecordError::NoteNotFound(title.trim().to_string()))?;
                self.success(&format!("Note '{}' deleted.", title.trim()))?;
            }
            Action::DeleteTag { name, title, tag } => {
                let removed = self
                    .book
                    .contact_mut(&name)?
                    .remove_tag_from_note_by_title(&title, &tag)?;
                if removed == 0 {
                    self.info(&format!(
                        "Note '{}' has no tag '{}'.",
                        title.trim(),
                        tag.trim()
                    ))?;
                } else {
                    self.success(&format!(
                        "Removed tag '{}' from note '{}'.",
                        tag.trim(),
                        title.trim()
                    ))?;
                }
            }

            Action::FindNotesByTag { tag } => {
                let notes = self.book.find_notes_by_tag(&tag);
                if notes.is_empty() {
                    self.info(&format!("No notes tagged '{}'.", tag.trim()))?;
                } else {
                    let table = notes_table(&notes);
                    self.print(&table)?;
                }
            }
            Action::FindNoteByTitle { title } => {
                let found = self
                    .book
                    .find_note_by_title(&title)
                    .ok_or_else(|| RecordError::NoteNotFound(title.trim().to_string()))?;
                let table = notes_table(&[found]);
                self.print(&table)?;
            }
            Action::Search { field, value } => {
                let records = match field {
                    Some(field) => self.book.find_contacts_by_field(field, &value),
                    None => self.book.find_contacts(&value),
                };
                if records.is_empty() {
                    self.info(&format!("No contacts match '{}'.", value.trim()))?;
                } else {
                    let table = contacts_table(&records);
                    self.print(&table)?;
                }
            }
            Action::Sort => {
                self.book.sort_records();
                self.success("Contacts sorted by name.")?;
            }
        }

        Ok(Flow::Continue)
    }

    fn add_contact(&mut self, name: &str, phone: Option<&str>) -> Result<(), SessionError> {
        if let Some(phone) = phone {
            if !self.confirm_shared_phone(name, phone)? {
                return self.warning("Operation cancelled.");
            }
        }

        let message = match self.book.find_contact_mut(name) {
            Some(record) => {
                if let Some(phone) = phone {
                    record.add_phone(phone)?;
                }
                "Contact updated."
            }
            None => {
                let mut record = Record::new(name)?;
                if let Some(phone) = phone {
                    record.add_phone(phone)?;
                }
                self.book.add_record(record);
                "Contact added."
            }
        };
        self.success(message)
    }

    fn add_phone(&mut self, name: &str, phone: &str) -> Result<(), SessionError> {
        self.book.contact(name)?;
        if !self.confirm_shared_phone(name, phone)? {
            return self.warning("Operation cancelled.");
        }
        let added = self.book.contact_mut(name)?.add_phone(phone)?.clone();
        self.success(&format!("Phone number {added} added to {}.", name.trim()))
    }

    fn add_tags(&mut self, name: &str, title: &str, tags: &[String]) -> Result<(), SessionError> {
        let record = self.book.contact_mut(name)?;
        if record.find_note_by_title(title).is_none() {
            return Err(RecordError::NoteNotFound(title.trim().to_string()).into());
        }
        for tag in tags {
            Tag::parse(tag)?;
        }
        for tag in tags {
            record.add_tag_to_note_by_title(title, tag)?;
        }
        self.success(&format!("Tags added to note '{}'.", title.trim()))
    }

    fn show_birthdays(&mut self, window: u32) -> Result<(), SessionError> {
        let today = self.today();
        let upcoming = self.book.upcoming_birthdays_on(today, window);
        if upcoming.is_empty() {
            let message = if window == 0 {
                "No birthdays today.".to_string()
            } else {
                format!("No birthdays in the next {window} day(s).")
            };
            return self.info(&message);
        }

        let rows: Vec<Vec<String>> = upcoming
            .iter()
            .filter_map(|record| {
                let birthday = record.birthday()?;
                Some(vec![
                    record.name().to_string(),
                    birthday.to_string(),
                    birthday
                        .next_occurrence(today)
                        .format(keeper::domain::birthday::FORMAT)
                        .to_string(),
                    birthday.days_until(today).to_string(),
                ])
            })
            .collect();
        let table = table::render(
            &["Name", "Birthday", "Celebrate on", "In days"],
            &rows,
            terminal::width(),
        );
        self.print(&"Upcoming birthdays:".success())?;
        self.print(&table)
    }

    /// Asks before giving a contact a number another contact already has.
    fn confirm_shared_phone(&mut self, name: &str, phone: &str) -> Result<bool, SessionError> {
        if !self.config.confirm_shared_phone {
            return Ok(true);
        }
        let Some(holder) = self.book.find_phone(phone) else {
            return Ok(true);
        };
        if holder.name().as_str() == name.trim() {
            return Ok(true);
        }
        let question = format!(
            "Phone number {} already belongs to {}. Add it to {}?",
            Phone::normalize(phone),
            holder.name(),
            name.trim()
        );
        self.confirm(&question)
    }

    fn confirm(&mut self, question: &str) -> Result<bool, SessionError> {
        match self.confirmation {
            Confirmation::Prompt => Ok(Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(question)
                .default(false)
                .interact()?),
            Confirmation::AssumeYes => {
                writeln!(self.out, "{question} yes")?;
                Ok(true)
            }
            Confirmation::Refuse => {
                let message = format!("{question} Pass --yes to confirm.");
                self.warning(&message)?;
                Ok(false)
            }
        }
    }

    fn print(&mut self, text: &str) -> Result<(), SessionError> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    fn success(&mut self, text: &str) -> Result<(), SessionError> {
        self.print(&text.success())
    }

    fn info(&mut self, text: &str) -> Result<(), SessionError> {
        self.print(&text.info())
    }

    fn warning(&mut self, text: &str) -> Result<(), SessionError> {
        self.print(&text.warning())
    }

    fn error(&mut self, text: &str) -> Result<(), SessionError> {
        self.print(&text.error())
    }
}

fn contacts_table(records: &[&Record]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                record.name().to_string(),
                join(record.phones()),
                record.email().map(ToString::to_string).unwrap_or_default(),
                record.birthday().map(ToString::to_string).unwrap_or_default(),
                record.address().map(ToString::to_string).unwrap_or_default(),
                record
                    .notes()
                    .iter()
                    .map(Note::title)
                    .collect::<Vec<_>>()
                    .join(", "),
                record
                    .notes()
                    .iter()
                    .flat_map(|note| note.tags().iter().map(Tag::as_str))
                    .collect::<Vec<_>>()
                    .join(", "),
                if record.is_owner() { "+" } else { "" }.to_string(),
            ]
        })
        .collect();

    table::render(
        &[
            "Name", "Phone", "Email", "Birthday", "Address", "Notes", "Tags", "Owner",
        ],
        &rows,
        terminal::width(),
    )
}

fn notes_table(notes: &[(&Record, &Note)]) -> String {
    let rows: Vec<Vec<String>> = notes
        .iter()
        .map(|(record, note)| {
            vec![
                record.name().to_string(),
                note.title().to_string(),
                join(note.tags()),
                note.value().unwrap_or_default().to_string(),
            ]
        })
        .collect();

    table::render(
        &["Contact", "Title", "Tags", "Note"],
        &rows,
        terminal::width(),
    )
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
