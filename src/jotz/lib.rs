//! # Jotz Architecture
//!
//! Jotz is a **UI-agnostic notes client library**. The terminal binary is
//! one client of it; the same core could sit behind any rendering surface
//! that can deliver events to a loop.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI layer (cli/, wired by main.rs)                         │
//! │  - Event loop, input parsing, screen rendering              │
//! │  - The ONLY place that knows about stdin/stdout             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API facade (api.rs)                                        │
//! │  - NotesApi<S: DocumentStore>: create/select/delete/        │
//! │    edit/flush/apply_snapshot                                │
//! │  - Accumulates status messages for the UI to drain          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core state (session.rs, sync.rs)                           │
//! │  - Session: mirrored notes + selection policy               │
//! │  - SyncController: edit buffer + debounced write deadline   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - DocumentStore trait: create/delete/merge_write +         │
//! │    whole-snapshot change subscription                       │
//! │  - FileStore (bundled local backend), MemoryStore (tests)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The sync lifecycle
//!
//! The store is the source of truth. Every mutation — local or from
//! another client of the same store — produces a full snapshot that
//! replaces the session mirror wholesale. Local edits buffer in the
//! [`sync::SyncController`] and flush as a single merge write after the
//! configured idle interval; the echo snapshot then closes the loop.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular arguments (including an
//! explicit `now` for anything time-driven), returns regular `Result`
//! types, and never touches stdout/stderr or a terminal. This is what
//! makes the debounce and selection policies unit-testable without a
//! rendering surface or a real clock.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade — entry point for all operations
//! - [`session`]: The note registry: mirror + selection
//! - [`sync`]: Debounced auto-save state machine
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Note`, `NoteId`, `NoteDraft`, `NotePatch`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Input parsing and screen rendering for the binary (not part of
//!   the lib API)

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod sync;
