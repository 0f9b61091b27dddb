use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DocumentStore, Listeners, SubscriptionId};
use crate::error::{JotzError, Result};
use crate::model::{Note, NoteDraft, NoteId, NotePatch};

const INDEX_FILENAME: &str = "notes.json";

/// Timestamps kept in the index so listing doesn't require parsing bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    updated_at: DateTime<Utc>,
}

/// File-backed document store: `notes.json` index plus one body file per
/// note (`note-{id}.md` by default). Subscribers of this store receive a
/// fresh snapshot after each mutation performed through it.
pub struct FileStore {
    root: PathBuf,
    file_ext: String,
    listeners: Listeners,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_ext: ".md".to_string(),
            listeners: Listeners::default(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    fn note_filename(&self, id: &NoteId) -> String {
        format!("note-{}{}", id, self.file_ext)
    }

    fn note_path(&self, id: &NoteId) -> PathBuf {
        self.root.join(self.note_filename(id))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(JotzError::Io)?;
        }
        Ok(())
    }

    fn load_index(&self) -> Result<HashMap<NoteId, IndexEntry>> {
        let index_file = self.root.join(INDEX_FILENAME);
        if !index_file.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(index_file).map_err(JotzError::Io)?;
        let index: HashMap<NoteId, IndexEntry> =
            serde_json::from_str(&content).map_err(JotzError::Serialization)?;
        Ok(index)
    }

    fn save_index(&self, index: &HashMap<NoteId, IndexEntry>) -> Result<()> {
        let index_file = self.root.join(INDEX_FILENAME);
        let content = serde_json::to_string_pretty(index).map_err(JotzError::Serialization)?;
        fs::write(index_file, content).map_err(JotzError::Io)?;
        Ok(())
    }

    fn read_body(&self, id: &NoteId) -> Result<String> {
        let path = self.note_path(id);
        if !path.exists() {
            // Missing body file: treat as empty rather than failing the
            // whole snapshot
            return Ok(String::new());
        }
        fs::read_to_string(path).map_err(JotzError::Io)
    }

    fn snapshot(&self) -> Result<Vec<Note>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let index = self.load_index()?;
        let mut notes = Vec::with_capacity(index.len());
        for (id, entry) in index {
            let body = self.read_body(&id)?;
            notes.push(Note {
                id,
                body,
                created_at: entry.created_at,
                updated_at: entry.updated_at,
            });
        }
        Ok(notes)
    }

    fn notify(&mut self) -> Result<()> {
        let snapshot = self.snapshot()?;
        self.listeners.broadcast(&snapshot);
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn subscribe(&mut self, listener: Sender<Vec<Note>>) -> Result<SubscriptionId> {
        let _ = listener.send(self.snapshot()?);
        Ok(self.listeners.add(listener))
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.remove(id);
    }

    fn create(&mut self, draft: &NoteDraft) -> Result<NoteId> {
        self.ensure_dir()?;
        let id = NoteId::new(Uuid::new_v4().to_string());

        // 1. Write the body file first so the index never points at nothing
        fs::write(self.note_path(&id), &draft.body).map_err(JotzError::Io)?;

        // 2. Update the index
        let mut index = self.load_index()?;
        index.insert(
            id.clone(),
            IndexEntry {
                created_at: draft.created_at,
                updated_at: draft.updated_at,
            },
        );
        self.save_index(&index)?;

        self.notify()?;
        Ok(id)
    }

    fn delete(&mut self, id: &NoteId) -> Result<()> {
        let mut index = self.load_index()?;
        if index.remove(id).is_none() {
            return Err(JotzError::NoteNotFound(id.clone()));
        }
        self.save_index(&index)?;

        let path = self.note_path(id);
        if path.exists() {
            fs::remove_file(path).map_err(JotzError::Io)?;
        }

        self.notify()
    }

    fn merge_write(&mut self, id: &NoteId, patch: &NotePatch) -> Result<()> {
        let mut index = self.load_index()?;
        let entry = index
            .get_mut(id)
            .ok_or_else(|| JotzError::NoteNotFound(id.clone()))?;

        if let Some(body) = &patch.body {
            fs::write(self.note_path(id), body).map_err(JotzError::Io)?;
        }
        if let Some(ts) = patch.updated_at {
            entry.updated_at = ts;
        }
        self.save_index(&index)?;

        self.notify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use tempfile::TempDir;

    fn make_store(temp: &TempDir) -> FileStore {
        FileStore::new(temp.path().join("notes"))
    }

    #[test]
    fn test_snapshot_of_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = make_store(&temp);
        assert!(store.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_create_persists_body_and_index() {
        let temp = TempDir::new().unwrap();
        let mut store = make_store(&temp);

        let id = store.create(&NoteDraft::new()).unwrap();

        let root = temp.path().join("notes");
        assert!(root.join(INDEX_FILENAME).exists());
        let body = fs::read_to_string(root.join(format!("note-{}.md", id))).unwrap();
        assert_eq!(body, crate::model::DEFAULT_NOTE_BODY);
    }

    #[test]
    fn test_notes_survive_a_new_store_instance() {
        let temp = TempDir::new().unwrap();
        let id = {
            let mut store = make_store(&temp);
            store.create(&NoteDraft::new()).unwrap()
        };

        let store = make_store(&temp);
        let notes = store.snapshot().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, id);
        assert_eq!(notes[0].body, crate::model::DEFAULT_NOTE_BODY);
    }

    #[test]
    fn test_merge_write_updates_body_and_timestamp() {
        let temp = TempDir::new().unwrap();
        let mut store = make_store(&temp);
        let draft = NoteDraft::new();
        let id = store.create(&draft).unwrap();

        let later = Utc::now() + chrono::Duration::seconds(5);
        store
            .merge_write(&id, &NotePatch::body("# Edited", later))
            .unwrap();

        let notes = store.snapshot().unwrap();
        assert_eq!(notes[0].body, "# Edited");
        assert_eq!(
            notes[0].updated_at.timestamp_millis(),
            later.timestamp_millis()
        );
        assert_eq!(
            notes[0].created_at.timestamp_millis(),
            draft.created_at.timestamp_millis()
        );
    }

    #[test]
    fn test_delete_removes_body_file() {
        let temp = TempDir::new().unwrap();
        let mut store = make_store(&temp);
        let id = store.create(&NoteDraft::new()).unwrap();
        let path = store.note_path(&id);
        assert!(path.exists());

        store.delete(&id).unwrap();
        assert!(!path.exists());
        assert!(store.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_id_errors() {
        let temp = TempDir::new().unwrap();
        let mut store = make_store(&temp);
        assert!(store.delete(&NoteId::new("ghost")).is_err());
    }

    #[test]
    fn test_mutations_broadcast_snapshots() {
        let temp = TempDir::new().unwrap();
        let mut store = make_store(&temp);

        let (tx, rx) = unbounded();
        store.subscribe(tx).unwrap();
        assert!(rx.recv().unwrap().is_empty());

        let id = store.create(&NoteDraft::new()).unwrap();
        assert_eq!(rx.recv().unwrap().len(), 1);

        store
            .merge_write(&id, &NotePatch::body("x", Utc::now()))
            .unwrap();
        assert_eq!(rx.recv().unwrap()[0].body, "x");

        store.delete(&id).unwrap();
        assert!(rx.recv().unwrap().is_empty());
    }

    #[test]
    fn test_custom_file_ext() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path().join("notes")).with_file_ext("txt");
        let id = store.create(&NoteDraft::new()).unwrap();
        assert!(temp
            .path()
            .join("notes")
            .join(format!("note-{}.txt", id))
            .exists());
    }
}
