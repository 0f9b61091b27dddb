//! # Domain Model: Notes and Patches
//!
//! A [`Note`] is the unit everything else revolves around: an opaque
//! identifier assigned by the document store, a markdown body, and a pair of
//! timestamps. Timestamps serialize as milliseconds since epoch, which is
//! the wire format every backend speaks.
//!
//! Two auxiliary shapes exist for the store boundary:
//!
//! - [`NoteDraft`]: a note without an identifier, handed to `create`. The
//!   store mints the id.
//! - [`NotePatch`]: partial fields for a merge write. Fields left `None`
//!   are preserved on the stored document, so an auto-save of the body
//!   never touches `created_at`.
//!
//! ## Display titles
//!
//! Note bodies carry no separate title field; the list pane derives one
//! from the first markdown block of the body (heading text, or the first
//! line of the first paragraph), truncated to 60 columns for display.

use chrono::{DateTime, Utc};
use pulldown_cmark::{Event, Parser, TagEnd};
use serde::{Deserialize, Serialize};

/// Body assigned to freshly created notes.
pub const DEFAULT_NOTE_BODY: &str = "# Type your markdown note's title here";

const TITLE_MAX_CHARS: usize = 60;

/// Opaque note identifier. Assigned by the document store on create and
/// never reassigned; the client treats it as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub body: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn display_title(&self) -> String {
        display_title(&self.body)
    }
}

/// A note as submitted to the store, before an id exists.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NoteDraft {
    /// A fresh note with the default body and matching timestamps.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            body: DEFAULT_NOTE_BODY.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial fields for a merge write. `None` fields are preserved on the
/// stored document.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub body: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotePatch {
    /// The auto-save patch: new body plus a refreshed `updated_at`.
    pub fn body(body: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            body: Some(body.into()),
            updated_at: Some(updated_at),
        }
    }

    /// Merge this patch into an existing note.
    pub fn apply(&self, note: &mut Note) {
        if let Some(body) = &self.body {
            note.body = body.clone();
        }
        if let Some(ts) = self.updated_at {
            note.updated_at = ts;
        }
    }
}

/// Derives a list-display title from a markdown body: the text of the first
/// heading or paragraph, cut at the first line break, truncated to 60 chars.
pub fn display_title(body: &str) -> String {
    let mut title = String::new();

    for event in Parser::new(body) {
        match event {
            Event::Text(t) | Event::Code(t) => title.push_str(&t),
            // A soft/hard break means the first line of the block is over
            Event::SoftBreak | Event::HardBreak => break,
            Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::Paragraph) => {
                if !title.trim().is_empty() {
                    break;
                }
            }
            _ => {}
        }
    }

    let title = title.trim();
    if title.is_empty() {
        return "Untitled".to_string();
    }

    if title.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = title.chars().take(TITLE_MAX_CHARS - 1).collect();
        format!("{}…", truncated)
    } else {
        title.to_string()
    }
}
