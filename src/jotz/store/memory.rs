use std::collections::HashMap;

use crossbeam_channel::Sender;
use uuid::Uuid;

use super::{DocumentStore, Listeners, SubscriptionId};
use crate::error::{JotzError, Result};
use crate::model::{Note, NoteDraft, NoteId, NotePatch};

/// In-memory document store, used by the test suites and available as a
/// scratch backend. Mirrors the behavior of [`super::fs::FileStore`]
/// without touching the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    notes: HashMap<NoteId, Note>,
    listeners: Listeners,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every mutation fail with a store error, for error-path tests.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            Err(JotzError::Store("simulated write failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn snapshot(&self) -> Vec<Note> {
        self.notes.values().cloned().collect()
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.listeners.broadcast(&snapshot);
    }
}

impl DocumentStore for MemoryStore {
    fn subscribe(&mut self, listener: Sender<Vec<Note>>) -> Result<SubscriptionId> {
        // New listeners start from the current state
        let _ = listener.send(self.snapshot());
        Ok(self.listeners.add(listener))
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.remove(id);
    }

    fn create(&mut self, draft: &NoteDraft) -> Result<NoteId> {
        self.check_writable()?;

        let id = NoteId::new(Uuid::new_v4().to_string());
        let note = Note {
            id: id.clone(),
            body: draft.body.clone(),
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        };
        self.notes.insert(id.clone(), note);
        self.notify();
        Ok(id)
    }

    fn delete(&mut self, id: &NoteId) -> Result<()> {
        self.check_writable()?;

        if self.notes.remove(id).is_none() {
            return Err(JotzError::NoteNotFound(id.clone()));
        }
        self.notify();
        Ok(())
    }

    fn merge_write(&mut self, id: &NoteId, patch: &NotePatch) -> Result<()> {
        self.check_writable()?;

        let note = self
            .notes
            .get_mut(id)
            .ok_or_else(|| JotzError::NoteNotFound(id.clone()))?;
        patch.apply(note);
        self.notify();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_subscribe_delivers_initial_snapshot() {
        let mut store = MemoryStore::new();
        store.create(&NoteDraft::new()).unwrap();

        let (tx, rx) = unbounded();
        store.subscribe(tx).unwrap();

        let snapshot = rx.recv().unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_create_assigns_id_and_notifies() {
        let mut store = MemoryStore::new();
        let (tx, rx) = unbounded();
        store.subscribe(tx).unwrap();
        assert!(rx.recv().unwrap().is_empty());

        let id = store.create(&NoteDraft::new()).unwrap();

        let snapshot = rx.recv().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert_eq!(snapshot[0].body, crate::model::DEFAULT_NOTE_BODY);
    }

    #[test]
    fn test_delete_removes_and_notifies() {
        let mut store = MemoryStore::new();
        let id = store.create(&NoteDraft::new()).unwrap();

        let (tx, rx) = unbounded();
        store.subscribe(tx).unwrap();
        rx.recv().unwrap();

        store.delete(&id).unwrap();
        assert!(rx.recv().unwrap().is_empty());
    }

    #[test]
    fn test_merge_write_preserves_created_at() {
        let mut store = MemoryStore::new();
        let draft = NoteDraft::new();
        let id = store.create(&draft).unwrap();

        let later = Utc::now();
        store
            .merge_write(&id, &NotePatch::body("edited", later))
            .unwrap();

        let (tx, rx) = unbounded();
        store.subscribe(tx).unwrap();
        let snapshot = rx.recv().unwrap();
        assert_eq!(snapshot[0].body, "edited");
        assert_eq!(snapshot[0].created_at, draft.created_at);
        assert_eq!(snapshot[0].updated_at, later);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = MemoryStore::new();
        let (tx, rx) = unbounded();
        let sub = store.subscribe(tx).unwrap();
        rx.recv().unwrap();

        store.unsubscribe(sub);
        store.create(&NoteDraft::new()).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_mutations_on_missing_note_error() {
        let mut store = MemoryStore::new();
        let ghost = NoteId::new("no-such-note");

        assert!(store.delete(&ghost).is_err());
        assert!(store
            .merge_write(&ghost, &NotePatch::body("x", Utc::now()))
            .is_err());
    }

    #[test]
    fn test_fail_writes_blocks_every_mutation() {
        let mut store = MemoryStore::new();
        let id = store.create(&NoteDraft::new()).unwrap();
        store.set_fail_writes(true);

        assert!(store.create(&NoteDraft::new()).is_err());
        assert!(store.delete(&id).is_err());
        assert!(store
            .merge_write(&id, &NotePatch::body("x", Utc::now()))
            .is_err());
    }
}
