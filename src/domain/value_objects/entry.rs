//! Entry embeddable shared by blog entries and guest book entries.

use std::fmt;

/// Creator name plus free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EntryEmbeddable {
    creator_name: Option<String>,
    entry: Option<String>,
}

impl EntryEmbeddable {
    pub fn new(creator_name: Option<String>, entry: Option<String>) -> Self {
        Self { creator_name, entry }
    }

    /// Replaces both creator and text.
    pub fn modify(&mut self, creator_name: impl Into<String>, entry: impl Into<String>) {
        self.creator_name = Some(creator_name.into());
        self.entry = Some(entry.into());
    }

    pub fn creator_name(&self) -> Option<&str> {
        self.creator_name.as_deref()
    }

    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    /// The entry text cut to at most 50 characters for log output.
    pub fn short_entry(&self) -> Option<String> {
        self.entry.as_ref().map(|entry| {
            if entry.chars().count() < 50 {
                entry.clone()
            } else {
                let head: String = entry.chars().take(47).collect();
                format!("{head}...")
            }
        })
    }
}

impl fmt::Display for EntryEmbeddable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            self.creator_name.as_deref().unwrap_or("<null>"),
            self.short_entry().as_deref().unwrap_or("<null>")
        )
    }
}
