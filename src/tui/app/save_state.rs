//! Per-field save tracking
//!
//! Each persisted field of a job has its own entry. A row is "saving" while
//! any of its fields is in flight, and shows the saved confirmation once no
//! field is in flight and at least one field recently succeeded.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::JobId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobField {
    Name,
    Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SaveKey {
    pub job: JobId,
    pub field: JobField,
}

impl SaveKey {
    pub fn new(job: JobId, field: JobField) -> Self {
        Self { job, field }
    }
}

/// Handle for one in-flight save. Only the latest ticket for a key counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub key: SaveKey,
    pub seq: u64,
}

/// Status indicator shown at the end of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStatus {
    #[default]
    Idle,
    Saving,
    Saved,
}

#[derive(Debug)]
pub struct SaveState {
    saving: HashMap<SaveKey, u64>,
    show_success: HashMap<SaveKey, Instant>,
    errors: HashMap<SaveKey, String>,
    next_seq: u64,
    flash: Duration,
}

impl SaveState {
    /// `flash` is how long a success confirmation stays visible
    pub fn new(flash: Duration) -> Self {
        Self {
            saving: HashMap::new(),
            show_success: HashMap::new(),
            errors: HashMap::new(),
            next_seq: 0,
            flash,
        }
    }

    /// Mark a field as saving. Clears any previous confirmation or error.
    pub fn begin(&mut self, key: SaveKey) -> SaveTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.show_success.remove(&key);
        self.errors.remove(&key);
        self.saving.insert(key.clone(), seq);
        SaveTicket { key, seq }
    }

    /// Record the outcome of a save.
    ///
    /// Returns false (and changes nothing) when a newer save for the same
    /// field has started since this ticket was issued.
    pub fn finish(&mut self, ticket: &SaveTicket, outcome: Result<(), String>, now: Instant) -> bool {
        if self.saving.get(&ticket.key) != Some(&ticket.seq) {
            return false;
        }
        self.saving.remove(&ticket.key);
        match outcome {
            Ok(()) => {
                self.show_success.insert(ticket.key.clone(), now);
            }
            Err(message) => {
                self.errors.insert(ticket.key.clone(), message);
            }
        }
        true
    }

    /// Drop confirmations older than the flash duration. Returns true if any expired.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.show_success.len();
        let flash = self.flash;
        self.show_success
            .retain(|_, shown_at| now.saturating_duration_since(*shown_at) < flash);
        self.show_success.len() != before
    }

    /// Forget everything about a job (archived or removed)
    pub fn forget(&mut self, job: &JobId) {
        self.saving.retain(|key, _| &key.job != job);
        self.show_success.retain(|key, _| &key.job != job);
        self.errors.retain(|key, _| &key.job != job);
    }

    #[must_use]
    pub fn is_saving(&self, job: &JobId) -> bool {
        self.saving.keys().any(|key| &key.job == job)
    }

    #[must_use]
    pub fn is_field_saving(&self, key: &SaveKey) -> bool {
        self.saving.contains_key(key)
    }

    #[must_use]
    pub fn shows_success(&self, job: &JobId) -> bool {
        self.show_success.keys().any(|key| &key.job == job)
    }

    #[must_use]
    pub fn row_status(&self, job: &JobId) -> RowStatus {
        if self.is_saving(job) {
            RowStatus::Saving
        } else if self.shows_success(job) {
            RowStatus::Saved
        } else {
            RowStatus::Idle
        }
    }

    #[must_use]
    pub fn field_error(&self, key: &SaveKey) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Errors for a job, ordered by field
    #[must_use]
    pub fn errors_for(&self, job: &JobId) -> Vec<(JobField, String)> {
        let mut errors: Vec<_> = self
            .errors
            .iter()
            .filter(|(key, _)| &key.job == job)
            .map(|(key, msg)| (key.field, msg.clone()))
            .collect();
        errors.sort_by_key(|(field, _)| *field);
        errors
    }

    /// True while any confirmation is visible (drives redraws on ticks)
    #[must_use]
    pub fn has_flashes(&self) -> bool {
        !self.show_success.is_empty()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.saving.is_empty()
    }
}
