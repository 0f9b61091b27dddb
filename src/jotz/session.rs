//! # Note Registry
//!
//! [`Session`] holds the local mirror of the store plus the selection
//! pointer. The mirror is rebuilt wholesale from every snapshot; there is
//! no incremental merge, so applying a snapshot is always a full
//! replacement of prior state.
//!
//! ## Selection policy
//!
//! - If the selected id is still present in a new snapshot, selection is
//!   preserved.
//! - If it is gone, selection falls back to the most-recently-updated
//!   remaining note, or to no selection when the mirror is empty.
//!
//! Selection may transiently point at an id not yet in the mirror: right
//! after `create`, the client selects the new id before the echo snapshot
//! arrives. That state resolves itself on the next snapshot.

use crate::model::{Note, NoteId};

#[derive(Default)]
pub struct Session {
    notes: Vec<Note>,
    selected: Option<NoteId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn selected_id(&self) -> Option<&NoteId> {
        self.selected.as_ref()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        let id = self.selected.as_ref()?;
        self.notes.iter().find(|n| &n.id == id)
    }

    /// Point selection at an id. The id may not be mirrored yet (see the
    /// module docs); the next snapshot settles it.
    pub fn select(&mut self, id: NoteId) {
        self.selected = Some(id);
    }

    /// Replace the entire mirror and re-apply the selection policy.
    pub fn apply_snapshot(&mut self, notes: Vec<Note>) {
        self.notes = notes;

        let still_present = self
            .selected
            .as_ref()
            .is_some_and(|id| self.notes.iter().any(|n| &n.id == id));
        if !still_present {
            self.selected = self
                .notes
                .iter()
                .max_by_key(|n| n.updated_at)
                .map(|n| n.id.clone());
        }
    }

    /// Notes in display order: most recently updated first.
    pub fn sorted(&self) -> Vec<&Note> {
        let mut sorted: Vec<&Note> = self.notes.iter().collect();
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sorted
    }

    /// Resolve a 1-based position in display order to a note.
    pub fn note_at(&self, pos: usize) -> Option<&Note> {
        if pos == 0 {
            return None;
        }
        self.sorted().get(pos - 1).copied()
    }
}
