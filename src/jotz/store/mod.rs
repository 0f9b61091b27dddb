//! # Storage Layer
//!
//! This module defines the document-store abstraction. The [`DocumentStore`]
//! trait is the client's entire contract with persistence: create, delete,
//! merge-write, and a live subscription that delivers the **full** current
//! set of notes after every change.
//!
//! ## Design Rationale
//!
//! The store is abstracted behind a trait to:
//! - Enable **testing** with [`memory::MemoryStore`] (no filesystem needed)
//! - Keep the client open to **remote backends** (the managed-database case)
//!   without changing core logic
//! - Keep session/sync logic **decoupled** from persistence details
//!
//! ## Change notification
//!
//! Listeners register a `crossbeam_channel::Sender<Vec<Note>>`. A listener
//! receives the current snapshot immediately on subscribe, and a fresh full
//! snapshot after every successful `create`, `delete`, or `merge_write`.
//! Snapshots are always whole-collection replacements; there is no
//! incremental diff protocol. Disconnected listeners are dropped on the
//! next broadcast, and [`DocumentStore::unsubscribe`] releases a listener
//! explicitly.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: the bundled local backend
//!   - Metadata index in `notes.json`
//!   - Note bodies in individual files: `note-{id}.md`
//! - [`memory::MemoryStore`]: in-memory store for tests
//!   - No persistence, plus a write-failure switch for error-path tests

use crossbeam_channel::Sender;

use crate::error::Result;
use crate::model::{Note, NoteDraft, NoteId, NotePatch};

pub mod fs;
pub mod memory;

/// Handle identifying a live change-notification listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Abstract interface to the document store backing the client.
pub trait DocumentStore {
    /// Register a change listener. The listener immediately receives the
    /// current snapshot, then a fresh one after every mutation.
    fn subscribe(&mut self, listener: Sender<Vec<Note>>) -> Result<SubscriptionId>;

    /// Release a listener registered with [`DocumentStore::subscribe`].
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Insert a new document; the store assigns and returns its id.
    fn create(&mut self, draft: &NoteDraft) -> Result<NoteId>;

    /// Remove the document with the given id.
    fn delete(&mut self, id: &NoteId) -> Result<()>;

    /// Update only the fields present in the patch, preserving the rest.
    fn merge_write(&mut self, id: &NoteId, patch: &NotePatch) -> Result<()>;
}

/// Listener registry shared by the store implementations.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    senders: Vec<(SubscriptionId, Sender<Vec<Note>>)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, sender: Sender<Vec<Note>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.senders.push((id, sender));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.senders.retain(|(sid, _)| *sid != id);
    }

    /// Send the snapshot to every listener, dropping disconnected ones.
    pub(crate) fn broadcast(&mut self, snapshot: &[Note]) {
        self.senders
            .retain(|(_, tx)| tx.send(snapshot.to_vec()).is_ok());
    }
}
