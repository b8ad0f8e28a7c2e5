//! The interactive command language.
//!
//! A line is split into words, the first one or two words select a command,
//! and the remaining words are its arguments. Every command resolves to one
//! [`Action`].

use std::fmt;

use keeper::domain::{EditableField, OptionalField, SearchField, UnknownFieldError};

/// A fully parsed command, ready to run against the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Hello,
    Help,
    Exit,
    AddContact {
        name: String,
        phone: Option<String>,
    },
    AddPhone {
        name: String,
        phone: String,
    },
    AddEmail {
        name: String,
        email: String,
    },
    AddAddress {
        name: String,
        address: String,
    },
    AddBirthday {
        name: String,
        birthday: String,
    },
    AddNote {
        name: String,
        title: String,
        text: Option<String>,
    },
    AddTags {
        name: String,
        title: String,
        tags: Vec<String>,
    },
    SetOwner {
        name: String,
    },
    ShowAll,
    ShowContact {
        name: String,
    },
    ShowPhones {
        name: String,
    },
    ShowBirthday {
        name: String,
    },
    ShowBirthdays {
        days: Option<u32>,
    },
    ShowNotes {
        name: String,
    },
    ShowOwner,
    EditInfo {
        name: String,
        field: EditableField,
        value: String,
    },
    EditPhone {
        name: String,
        old: String,
        new: String,
    },
    EditNote {
        name: String,
        title: String,
        new_title: String,
        text: Option<String>,
    },
    DeleteContact {
        name: String,
    },
    DeletePhone {
        name: String,
        phone: String,
    },
    DeleteInfo {
        name: String,
        field: OptionalField,
    },
    DeleteNote {
        name: String,
        title: String,
    },
    DeleteTag {
        name: String,
        title: String,
        tag: String,
    },
    FindNotesByTag {
        tag: String,
    },
    FindNoteByTitle {
        title: String,
    },
    /// Search one field, or every field when `field` is `None`.
    Search {
        field: Option<SearchField>,
        value: String,
    },
    Sort,
}

impl Action {
    /// Whether running the action can change the address book.
    pub const fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::AddContact { .. }
                | Self::AddPhone { .. }
                | Self::AddEmail { .. }
                | Self::AddAddress { .. }
                | Self::AddBirthday { .. }
                | Self::AddNote { .. }
                | Self::AddTags { .. }
                | Self::SetOwner { .. }
                | Self::EditInfo { .. }
                | Self::EditPhone { .. }
                | Self::EditNote { .. }
                | Self::DeleteContact { .. }
                | Self::DeletePhone { .. }
                | Self::DeleteInfo { .. }
                | Self::DeleteNote { .. }
                | Self::DeleteTag { .. }
                | Self::Sort
        )
    }
}

/// One argument slot in a command's synopsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// The name of an existing contact.
    Contact,
    /// A field that `edit info` accepts.
    EditableField,
    /// A field that `delete info` accepts.
    OptionalField,
    /// A field that `search` accepts, or `all`.
    SearchField,
    /// A single required word.
    Value(&'static str),
    /// A single optional word.
    Optional(&'static str),
    /// One or more words.
    Many(&'static str),
    /// Any number of words, possibly none.
    OptionalMany(&'static str),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Contact => f.write_str("<name>"),
            Self::EditableField => f.write_str("<name|email|birthday|address>"),
            Self::OptionalField => f.write_str("<email|birthday|address>"),
            Self::SearchField => f.write_str("<field|all>"),
            Self::Value(name) => write!(f, "<{name}>"),
            Self::Optional(name) => write!(f, "[{name}]"),
            Self::Many(name) => write!(f, "<{name}...>"),
            Self::OptionalMany(name) => write!(f, "[{name}...]"),
        }
    }
}

/// The synopsis and description of one command.
#[derive(Debug)]
pub struct Usage {
    pub command: &'static str,
    pub subcommand: Option<&'static str>,
    pub args: &'static [Arg],
    pub about: &'static str,
}

impl Usage {
    /// The command words followed by the argument placeholders.
    pub fn synopsis(&self) -> String {
        let mut words = vec![self.command.to_string()];
        words.extend(self.subcommand.map(ToString::to_string));
        words.extend(self.args.iter().map(ToString::to_string));
        words.join(" ")
    }
}

const fn usage(
    command: &'static str,
    subcommand: Option<&'static str>,
    args: &'static [Arg],
    about: &'static str,
) -> Usage {
    Usage {
        command,
        subcommand,
        args,
        about,
    }
}

/// Every command the session understands, in the order help lists them.
pub const USAGE: &[Usage] = &[
    usage("hello", None, &[], "get a greeting"),
    usage("help", None, &[], "show this list"),
    usage("exit", None, &[], "leave the session"),
    usage("close", None, &[], "leave the session"),
    usage(
        "add",
        Some("contact"),
        &[Arg::Contact, Arg::OptionalMany("phone")],
        "create a contact, or add a phone to an existing one",
    ),
    usage(
        "add",
        Some("phone"),
        &[Arg::Contact, Arg::Many("phone")],
        "add a phone number",
    ),
    usage(
        "add",
        Some("email"),
        &[Arg::Contact, Arg::Value("email")],
        "set the email address",
    ),
    usage(
        "add",
        Some("address"),
        &[Arg::Contact, Arg::Many("address")],
        "set the postal address",
    ),
    usage(
        "add",
        Some("birthday"),
        &[Arg::Contact, Arg::Value("DD.MM.YYYY")],
        "set the birthday",
    ),
    usage(
        "add",
        Some("note"),
        &[Arg::Contact, Arg::Value("title"), Arg::OptionalMany("text")],
        "attach a note",
    ),
    usage(
        "add",
        Some("tags"),
        &[Arg::Contact, Arg::Value("title"), Arg::Many("tag")],
        "tag a note",
    ),
    usage(
        "owner",
        None,
        &[Arg::Contact],
        "mark a contact as the owner of the book",
    ),
    usage("show", Some("all"), &[], "list every contact"),
    usage("show", Some("contact"), &[Arg::Contact], "show one contact"),
    usage(
        "show",
        Some("phones"),
        &[Arg::Contact],
        "list a contact's phone numbers",
    ),
    usage(
        "show",
        Some("birthday"),
        &[Arg::Contact],
        "show a contact's birthday",
    ),
    usage(
        "show",
        Some("birthdays"),
        &[Arg::Optional("days")],
        "list birthdays in the next days",
    ),
    usage("show", Some("notes"), &[Arg::Contact], "list a contact's notes"),
    usage("show", Some("owner"), &[], "show the owner of the book"),
    usage(
        "edit",
        Some("info"),
        &[Arg::Contact, Arg::EditableField, Arg::Many("value")],
        "replace a field",
    ),
    usage(
        "edit",
        Some("phone"),
        &[Arg::Contact, Arg::Value("old"), Arg::Value("new")],
        "replace a phone number",
    ),
    usage(
        "edit",
        Some("note"),
        &[
            Arg::Contact,
            Arg::Value("title"),
            Arg::Value("new title"),
            Arg::OptionalMany("text"),
        ],
        "rewrite a note",
    ),
    usage(
        "delete",
        Some("contact"),
        &[Arg::Contact],
        "remove a contact",
    ),
    usage(
        "delete",
        Some("phone"),
        &[Arg::Contact, Arg::Many("phone")],
        "remove a phone number",
    ),
    usage(
        "delete",
        Some("info"),
        &[Arg::Contact, Arg::OptionalField],
        "clear a field",
    ),
    usage(
        "delete",
        Some("note"),
        &[Arg::Contact, Arg::Many("title")],
        "remove a note",
    ),
    usage(
        "delete",
        Some("tag"),
        &[Arg::Contact, Arg::Value("title"), Arg::Value("tag")],
        "remove a tag from a note",
    ),
    usage(
        "find",
        Some("notes-by-tag"),
        &[Arg::Value("tag")],
        "list notes carrying a tag",
    ),
    usage(
        "find",
        Some("note-by-title"),
        &[Arg::Many("title")],
        "find a note by its title",
    ),
    usage(
        "search",
        None,
        &[Arg::SearchField, Arg::Many("value")],
        "find contacts whose field contains a value",
    ),
    usage("sort", None, &[], "sort contacts by name"),
];

/// The distinct top-level command words, in help order.
pub fn commands() -> Vec<&'static str> {
    let mut commands: Vec<&str> = Vec::new();
    for usage in USAGE {
        if !commands.contains(&usage.command) {
            commands.push(usage.command);
        }
    }
    commands
}

/// The subcommand words of `command`, in help order.
pub fn subcommands(command: &str) -> Vec<&'static str> {
    USAGE
        .iter()
        .filter(|usage| usage.command == command)
        .filter_map(|usage| usage.subcommand)
        .collect()
}

/// Finds the usage entry for a command.
pub fn find_usage(command: &str, subcommand: Option<&str>) -> Option<&'static Usage> {
    USAGE
        .iter()
        .find(|usage| usage.command == command && usage.subcommand == subcommand)
}

/// Errors raised while parsing a command line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated quote")]
    UnterminatedQuote,

    #[error("unknown command '{0}', type 'help' to list commands")]
    UnknownCommand(String),

    #[error("'{command}' needs one of: {}", .expected.join(", "))]
    MissingSubcommand {
        command: String,
        expected: Vec<&'static str>,
    },

    #[error("unknown command '{command} {given}', expected one of: {}", .expected.join(", "))]
    UnknownSubcommand {
        command: String,
        given: String,
        expected: Vec<&'static str>,
    },

    #[error("usage: {0}")]
    Usage(String),

    #[error("'{0}' is not a number of days")]
    InvalidDays(String),

    #[error(transparent)]
    Field(#[from] UnknownFieldError),
}

/// Splits a line into words.
///
/// Words are separated by whitespace. Double quotes group words, so
/// `show contact "Mary Ann"` yields three words.
///
/// # Errors
///
/// Returns [`ParseError::UnterminatedQuote`] if a quote is left open.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let (words, open) = split_words(line);
    if open {
        return Err(ParseError::UnterminatedQuote);
    }
    Ok(words)
}

/// Splits a line into words, tolerating an open quote at the end.
///
/// Returns the words and whether the last word is still inside quotes.
pub fn split_words(line: &str) -> (Vec<String>, bool) {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }

    (words, quoted)
}

/// Parses one input line.
///
/// Returns `None` for a blank line.
///
/// # Errors
///
/// Returns a [`ParseError`] describing what is wrong with the line.
pub fn parse(line: &str) -> Result<Option<Action>, ParseError> {
    let words = tokenize(line)?;
    if words.is_empty() {
        return Ok(None);
    }
    parse_words(&words).map(Some)
}

/// Parses a line that was already split into words.
///
/// # Errors
///
/// Returns a [`ParseError`] describing what is wrong with the words.
pub fn parse_words(words: &[String]) -> Result<Action, ParseError> {
    let Some((head, rest)) = words.split_first() else {
        return Err(ParseError::UnknownCommand(String::new()));
    };
    let command = head.to_lowercase();

    let action = match command.as_str() {
        "hello" => no_args(rest, "hello", Action::Hello)?,
        "help" => no_args(rest, "help", Action::Help)?,
        "exit" => no_args(rest, "exit", Action::Exit)?,
        "close" => no_args(rest, "close", Action::Exit)?,
        "sort" => no_args(rest, "sort", Action::Sort)?,
        "owner" => match rest {
            [name] => Action::SetOwner { name: name.clone() },
            _ => return Err(usage_error("owner", None)),
        },
        "search" => match rest {
            [field, value @ ..] if !value.is_empty() => Action::Search {
                field: parse_search_field(field)?,
                value: value.join(" "),
            },
            _ => return Err(usage_error("search", None)),
        },
        "add" | "show" | "edit" | "delete" | "find" => {
            let expected = subcommands(&command);
            let Some((sub, args)) = rest.split_first() else {
                return Err(ParseError::MissingSubcommand { command, expected });
            };
            let sub = sub.to_lowercase();
            if !expected.contains(&sub.as_str()) {
                return Err(ParseError::UnknownSubcommand {
                    command,
                    given: sub,
                    expected,
                });
            }
            parse_subcommand(&command, &sub, args)?
        }
        _ => return Err(ParseError::UnknownCommand(head.clone())),
    };

    Ok(action)
}

fn no_args(rest: &[String], command: &str, action: Action) -> Result<Action, ParseError> {
    if rest.is_empty() {
        Ok(action)
    } else {
        Err(usage_error(command, None))
    }
}

fn usage_error(command: &str, subcommand: Option<&str>) -> ParseError {
    let synopsis = find_usage(command, subcommand).map_or_else(
        || [Some(command), subcommand].into_iter().flatten().collect::<Vec<_>>().join(" "),
        Usage::synopsis,
    );
    ParseError::Usage(synopsis)
}

fn parse_search_field(word: &str) -> Result<Option<SearchField>, ParseError> {
    if word.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        Ok(Some(word.parse()?))
    }
}

fn optional_text(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

#[allow(clippy::too_many_lines)]
fn parse_subcommand(command: &str, sub: &str, args: &[String]) -> Result<Action, ParseError> {
    let action = match (command, sub, args) {
        ("add", "contact", [name, phone @ ..]) => Action::AddContact {
            name: name.clone(),
            phone: optional_text(phone),
        },
        ("add", "phone", [name, phone @ ..]) if !phone.is_empty() => Action::AddPhone {
            name: name.clone(),
            phone: phone.join(" "),
        },
        ("add", "email", [name, email]) => Action::AddEmail {
            name: name.clone(),
            email: email.clone(),
        },
        ("add", "address", [name, address @ ..]) if !address.is_empty() => Action::AddAddress {
            name: name.clone(),
            address: address.join(" "),
        },
        ("add", "birthday", [name, birthday]) => Action::AddBirthday {
            name: name.clone(),
            birthday: birthday.clone(),
        },
        ("add", "note", [name, title, text @ ..]) => Action::AddNote {
            name: name.clone(),
            title: title.clone(),
            text: optional_text(text),
        },
        ("add", "tags", [name, title, tags @ ..]) if !tags.is_empty() => Action::AddTags {
            name: name.clone(),
            title: title.clone(),
            tags: tags.to_vec(),
        },

        ("show", "all", []) => Action::ShowAll,
        ("show", "contact", [name]) => Action::ShowContact { name: name.clone() },
        ("show", "phones", [name]) => Action::ShowPhones { name: name.clone() },
        ("show", "birthday", [name]) => Action::ShowBirthday { name: name.clone() },
        ("show", "birthdays", []) => Action::ShowBirthdays { days: None },
        ("show", "birthdays", [days]) => Action::ShowBirthdays {
            days: Some(
                days.parse()
                    .map_err(|_| ParseError::InvalidDays(days.clone()))?,
            ),
        },
        ("show", "notes", [name]) => Action::ShowNotes { name: name.clone() },
        ("show", "owner", []) => Action::ShowOwner,

        ("edit", "info", [name, field, value @ ..]) if !value.is_empty() => Action::EditInfo {
            name: name.clone(),
            field: field.parse()?,
            value: value.join(" "),
        },
        ("edit", "phone", [name, old, new]) => Action::EditPhone {
            name: name.clone(),
            old: old.clone(),
            new: new.clone(),
        },
        ("edit", "note", [name, title, new_title, text @ ..]) => Action::EditNote {
            name: name.clone(),
            title: title.clone(),
            new_title: new_title.clone(),
            text: optional_text(text),
        },

        ("delete", "contact", [name]) => Action::DeleteContact { name: name.clone() },
        ("delete", "phone", [name, phone @ ..]) if !phone.is_empty() => Action::DeletePhone {
            name: name.clone(),
            phone: phone.join(" "),
        },
        ("delete", "info", [name, field]) => Action::DeleteInfo {
            name: name.clone(),
            field: field.parse()?,
        },
        ("delete", "note", [name, title @ ..]) if !title.is_empty() => Action::DeleteNote {
            name: name.clone(),
            title: title.join(" "),
        },
        ("delete", "tag", [name, title, tag]) => Action::DeleteTag {
            name: name.clone(),
            title: title.clone(),
            tag: tag.clone(),
        },

        ("find", "notes-by-tag", [tag]) => Action::FindNotesByTag { tag: tag.clone() },
        ("find", "note-by-title", title) if !title.is_empty() => Action::FindNoteByTitle {
            title: title.join(" "),
        },

        _ => return Err(usage_error(command, Some(sub))),
    };
    Ok(action)
}
