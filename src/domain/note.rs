use std::fmt;

use crate::domain::{Field, Tag, Title, ValidationError};

/// A titled piece of text attached to a contact.
///
/// Tags keep their insertion order. The same tag may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    title: Title,
    value: Option<String>,
    tags: Vec<Tag>,
}

impl Note {
    /// Creates an untagged note.
    ///
    /// A blank `value` is stored as no value at all.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] if the title is blank.
    pub fn new(title: &str, value: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self::with_title(Title::parse(title)?, value))
    }

    pub(crate) fn with_title(title: Title, value: Option<&str>) -> Self {
        Self {
            title,
            value: clean_value(value),
            tags: Vec::new(),
        }
    }

    /// The note's title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// The body of the note, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The tags attached to the note, in the order they were added.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Whether the note carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.as_str() == tag)
    }

    /// Appends a tag.
    pub fn add_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    /// Removes every occurrence of `tag`.
    ///
    /// Returns the number of tags removed.
    pub fn remove_tag(&mut self, tag: &str) -> usize {
        let tag = tag.trim();
        let before = self.tags.len();
        self.tags.retain(|t| t.as_str() != tag);
        before - self.tags.len()
    }

    pub(crate) fn set_title(&mut self, title: Title) {
        self.title = title;
    }

    pub(crate) fn set_value(&mut self, value: Option<&str>) {
        self.value = clean_value(value);
    }
}

fn clean_value(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(ToString::to_string)
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Note: [{}]", self.title)?;
        if let Some(value) = &self.value {
            write!(f, ": {value}")?;
        }
        if !self.tags.is_empty() {
            let tags = self
                .tags
                .iter()
                .map(Tag::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "\nTags: {tags}")?;
        }
        Ok(())
    }
}
