//! Reading context fed into synthesis.
//!
//! Assembled by the host from the document store ("read recent notes/books")
//! and passed in whole; every list defaults to empty and the session book is
//! optional, so a context-free session synthesizes fine.

use serde::{Deserialize, Serialize};

/// A book reference as the host's library stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookRef {
    pub title: String,
    pub author: Option<String>,
}

impl BookRef {
    pub fn new(title: impl Into<String>, author: Option<String>) -> Self {
        Self {
            title: title.into(),
            author,
        }
    }

    /// Title trimmed, or `None` when blank.
    pub(crate) fn display_title(&self) -> Option<&str> {
        let trimmed = self.title.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Author trimmed, or `None` when absent or blank.
    pub(crate) fn display_author(&self) -> Option<&str> {
        let trimmed = self.author.as_deref()?.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Book and shelf context for one reading session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthesisContext {
    /// The book this session was recorded against, if any.
    pub book: Option<BookRef>,
    pub currently_reading: Vec<BookRef>,
    pub want_to_read: Vec<BookRef>,
    pub read: Vec<BookRef>,
    /// Most recent note excerpts, newest first.
    pub recent_notes: Vec<String>,
}

impl SynthesisContext {
    pub fn is_empty(&self) -> bool {
        self.book.is_none()
            && self.currently_reading.is_empty()
            && self.want_to_read.is_empty()
            && self.read.is_empty()
            && self.recent_notes.is_empty()
    }
}
