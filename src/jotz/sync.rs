//! # Sync Controller
//!
//! Converts bursts of local edits into a single persisted write after a
//! quiet period. The controller is a pure state machine over an explicit
//! `now`, so the debounce behavior is unit-testable without timers:
//! the event loop owns the clock and asks [`SyncController::take_due`]
//! whenever the deadline may have passed.
//!
//! Invariant: at most one pending write exists per session. Every edit
//! rearms the single deadline, cancelling the previous one; reseeding
//! (selection change) disarms it entirely.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

pub struct SyncController {
    buffer: String,
    persisted: String,
    deadline: Option<Instant>,
    debounce: Duration,
}

impl SyncController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            buffer: String::new(),
            persisted: String::new(),
            deadline: None,
            debounce,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Replace the edit buffer and (re)start the idle timer.
    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        self.buffer = text.into();
        self.deadline = Some(now + self.debounce);
    }

    /// If the idle deadline has passed, disarm it and return the buffer —
    /// unless it matches the persisted body, in which case the write is
    /// skipped.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.buffer != self.persisted {
                    Some(self.buffer.clone())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Record a successfully persisted body.
    pub fn mark_persisted(&mut self, body: impl Into<String>) {
        self.persisted = body.into();
    }

    /// Update the persisted baseline from a snapshot without touching
    /// in-flight edits.
    pub fn refresh_persisted(&mut self, body: &str) {
        self.persisted = body.to_string();
    }

    /// Selection changed: buffer and baseline both become the newly
    /// selected note's body, and any pending write is abandoned.
    pub fn reseed(&mut self, body: &str) {
        self.buffer = body.to_string();
        self.persisted = body.to_string();
        self.deadline = None;
    }
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
