//! # API Facade
//!
//! [`NotesApi`] is the single entry point for all client operations. It
//! owns the document store handle, the [`Session`] mirror, and the
//! [`SyncController`], and exposes the operations the UI binds to:
//! create, select, delete, edit, flush, apply-snapshot.
//!
//! ## Generic over DocumentStore
//!
//! `NotesApi<S: DocumentStore>` is generic over the backend:
//! - Production: `NotesApi<FileStore>`
//! - Testing: `NotesApi<MemoryStore>`
//!
//! The facade performs no I/O of its own beyond store calls and never
//! touches stdout; user-facing feedback accumulates as [`UiMessage`]s the
//! CLI layer drains and prints.
//!
//! ## Failure policy
//!
//! Store failures on create/delete/write do not abort the session and are
//! not retried. They surface as `Error`-level messages and the mirror is
//! left unchanged — the UI simply doesn't update until the store succeeds.

use std::time::Instant;

use chrono::Utc;
use crossbeam_channel::Sender;

use crate::error::Result;
use crate::model::{Note, NoteDraft, NotePatch};
use crate::session::Session;
use crate::store::{DocumentStore, SubscriptionId};
use crate::sync::SyncController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct UiMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl UiMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// The main facade for note operations. All UI clients interact through
/// this type.
pub struct NotesApi<S: DocumentStore> {
    store: S,
    session: Session,
    sync: SyncController,
    messages: Vec<UiMessage>,
}

impl<S: DocumentStore> NotesApi<S> {
    pub fn new(store: S, debounce: std::time::Duration) -> Self {
        Self {
            store,
            session: Session::new(),
            sync: SyncController::new(debounce),
            messages: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Sender<Vec<Note>>) -> Result<SubscriptionId> {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.store.unsubscribe(id);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn buffer(&self) -> &str {
        self.sync.buffer()
    }

    pub fn sync_deadline(&self) -> Option<Instant> {
        self.sync.deadline()
    }

    /// Drain accumulated status messages for the UI to print.
    pub fn take_messages(&mut self) -> Vec<UiMessage> {
        std::mem::take(&mut self.messages)
    }

    pub fn push_message(&mut self, message: UiMessage) {
        self.messages.push(message);
    }

    /// Create a note with the default body and select it. The mirror picks
    /// the note up when the echo snapshot arrives.
    pub fn create_note(&mut self) {
        let draft = NoteDraft::new();
        match self.store.create(&draft) {
            Ok(id) => {
                self.session.select(id);
                self.sync.reseed(&draft.body);
            }
            Err(e) => self
                .messages
                .push(UiMessage::error(format!("Could not create note: {}", e))),
        }
    }

    /// Select the note at a 1-based display position and reseed the edit
    /// buffer from its body.
    pub fn select_note(&mut self, pos: usize) {
        let Some(note) = self.session.note_at(pos) else {
            self.messages
                .push(UiMessage::warning(format!("No note at position {}", pos)));
            return;
        };
        let (id, body) = (note.id.clone(), note.body.clone());
        self.session.select(id);
        self.sync.reseed(&body);
    }

    /// Delete the note at a 1-based display position. The mirror is not
    /// touched optimistically; removal lands with the echo snapshot, at
    /// which point a stale selection falls back per policy.
    pub fn delete_note(&mut self, pos: usize) {
        let Some(id) = self.session.note_at(pos).map(|n| n.id.clone()) else {
            self.messages
                .push(UiMessage::warning(format!("No note at position {}", pos)));
            return;
        };
        if let Err(e) = self.store.delete(&id) {
            self.messages
                .push(UiMessage::error(format!("Could not delete note: {}", e)));
        }
    }

    /// Buffer an edit to the selected note, restarting the idle timer.
    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        if self.session.selected_id().is_none() {
            self.messages
                .push(UiMessage::warning("No note selected".to_string()));
            return;
        }
        self.sync.edit(text, now);
    }

    /// Issue the pending write if its deadline has passed and the buffer
    /// differs from the persisted body.
    pub fn flush_due(&mut self, now: Instant) {
        let Some(body) = self.sync.take_due(now) else {
            return;
        };
        let Some(id) = self.session.selected_id().cloned() else {
            return;
        };

        let patch = NotePatch::body(body.clone(), Utc::now());
        match self.store.merge_write(&id, &patch) {
            Ok(()) => self.sync.mark_persisted(body),
            Err(e) => self
                .messages
                .push(UiMessage::error(format!("Could not save note: {}", e))),
        }
    }

    /// Apply a change notification: replace the mirror, then settle the
    /// edit buffer. A moved (or cleared) selection reseeds the buffer; a
    /// surviving selection only refreshes the persisted baseline so
    /// in-flight edits are kept.
    pub fn apply_snapshot(&mut self, notes: Vec<Note>) {
        let before = self.session.selected_id().cloned();
        self.session.apply_snapshot(notes);
        let after = self.session.selected_id().cloned();

        if before != after {
            match self.session.selected_note() {
                Some(note) => {
                    let body = note.body.clone();
                    self.sync.reseed(&body);
                }
                None => self.sync.reseed(""),
            }
        } else if let Some(note) = self.session.selected_note() {
            let body = note.body.clone();
            self.sync.refresh_persisted(&body);
        }
    }
}
