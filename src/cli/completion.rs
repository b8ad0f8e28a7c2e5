//! Tab completion for the interactive prompt.

use dialoguer::Completion;
use keeper::domain::{EditableField, OptionalField, SearchField};

use super::command::{self, Arg};

/// Completes command words, field names and contact names.
#[derive(Debug, Default)]
pub struct Completer {
    names: Vec<String>,
}

impl Completer {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            names: names.into_iter().map(ToString::to_string).collect(),
        }
    }

    /// The words that may follow `words`.
    fn candidates(&self, words: &[String]) -> Vec<String> {
        let Some((first, rest)) = words.split_first() else {
            return to_strings(command::commands());
        };
        let first = first.to_lowercase();
        let subcommands = command::subcommands(&first);

        let (usage, position) = if subcommands.is_empty() {
            (command::find_usage(&first, None), rest.len())
        } else {
            let Some((sub, args)) = rest.split_first() else {
                return to_strings(subcommands);
            };
            (
                command::find_usage(&first, Some(&sub.to_lowercase())),
                args.len(),
            )
        };

        match usage.and_then(|usage| usage.args.get(position)) {
            Some(Arg::Contact) => self.names.clone(),
            Some(Arg::EditableField) => {
                to_strings(EditableField::ALL.iter().map(|field| field.as_str()))
            }
            Some(Arg::OptionalField) => {
                to_strings(OptionalField::ALL.iter().map(|field| field.as_str()))
            }
            Some(Arg::SearchField) => to_strings(
                std::iter::once("all").chain(SearchField::ALL.iter().map(|field| field.as_str())),
            ),
            _ => Vec::new(),
        }
    }
}

impl Completion for Completer {
    fn get(&self, input: &str) -> Option<String> {
        let (mut words, open_quote) = command::split_words(input);
        let typing_word = open_quote || !input.ends_with(char::is_whitespace);
        let partial = if typing_word {
            words.pop().unwrap_or_default()
        } else {
            String::new()
        };

        let needle = partial.to_lowercase();
        let candidates = self.candidates(&words);
        let matches: Vec<&str> = candidates
            .iter()
            .map(String::as_str)
            .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
            .collect();

        let completed = match matches.as_slice() {
            [] => return None,
            [only] => format!("{} ", quote(only, true)),
            many => {
                let prefix = common_prefix(many);
                if prefix.chars().count() <= partial.chars().count() {
                    return None;
                }
                quote(&prefix, false)
            }
        };

        let mut line: Vec<String> = words.iter().map(|word| quote(word, true)).collect();
        line.push(completed);
        Some(line.join(" "))
    }
}

fn to_strings<'a>(words: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    words.into_iter().map(ToString::to_string).collect()
}

/// Wraps words containing whitespace in quotes, leaving the quote open if
/// the word is not finished.
fn quote(word: &str, finished: bool) -> String {
    if !word.contains(char::is_whitespace) {
        return word.to_string();
    }
    if finished {
        format!("\"{word}\"")
    } else {
        format!("\"{word}")
    }
}

fn common_prefix(words: &[&str]) -> String {
    let Some((first, rest)) = words.split_first() else {
        return String::new();
    };
    let mut prefix: Vec<char> = first.chars().collect();
    for word in rest {
        let shared = prefix
            .iter()
            .zip(word.chars())
            .take_while(|(a, b)| a.eq_ignore_ascii_case(b))
            .count();
        prefix.truncate(shared);
    }
    prefix.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn completer() -> Completer {
        Completer::new(["Alice", "Mary Ann", "Marko"])
    }

    #[test_case("sh", Some("show "); "command word")]
    #[test_case("he", Some("hel"); "shared prefix")]
    #[test_case("", None; "nothing typed")]
    #[test_case("show c", Some("show contact "); "subcommand")]
    #[test_case("SHOW bi", Some("SHOW birthday"); "shared subcommand prefix")]
    #[test_case("show contact Al", Some("show contact Alice "); "contact name")]
    #[test_case("show contact Mary", Some(r#"show contact "Mary Ann" "#); "name with a space")]
    #[test_case("show contact Mar", None; "ambiguous name")]
    #[test_case(r#"show contact "Mary A"#, Some(r#"show contact "Mary Ann" "#); "inside quotes")]
    #[test_case("edit info Alice em", Some("edit info Alice email "); "editable field")]
    #[test_case("delete info Alice n", None; "name cannot be cleared")]
    #[test_case("search ph", Some("search phone "); "search field")]
    #[test_case("search a", None; "all and address share a prefix")]
    #[test_case("owner Al", Some("owner Alice "); "owner takes a contact")]
    #[test_case("show all ", None; "no further arguments")]
    #[test_case("frobnicate ", None; "unknown command")]
    fn completes(input: &str, expected: Option<&str>) {
        assert_eq!(completer().get(input).as_deref(), expected);
    }

    #[test]
    fn lists_every_contact_after_owner() {
        let completer = completer();
        let words = vec!["owner".to_string()];
        assert_eq!(completer.candidates(&words), ["Alice", "Mary Ann", "Marko"]);
    }
}
