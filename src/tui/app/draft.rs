//! The "new job" row
//!
//! A draft exists only between "add new job" and either a successful create
//! or a discard. It has no id until the backend assigns one.

use crate::models::HexColor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobDraft {
    /// Identity of this draft, stable until it is hidden
    pub seq: u64,
    pub name: String,
    pub color: HexColor,
    /// A create request is in flight
    pub saving: bool,
    /// Last create failure, shown under the row
    pub error: Option<String>,
}

/// What to send to the backend when a draft is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftCommit {
    pub seq: u64,
    pub name: String,
    pub color: HexColor,
}

#[derive(Debug, Default)]
pub struct NewJobSlot {
    draft: Option<NewJobDraft>,
    next_seq: u64,
}

impl NewJobSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an empty draft. Does nothing (returns false) if one is already visible.
    pub fn open(&mut self, color: HexColor) -> bool {
        if self.draft.is_some() {
            return false;
        }
        self.next_seq += 1;
        self.draft = Some(NewJobDraft {
            seq: self.next_seq,
            name: String::new(),
            color,
            saving: false,
            error: None,
        });
        true
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.draft.is_some()
    }

    #[must_use]
    pub fn draft(&self) -> Option<&NewJobDraft> {
        self.draft.as_ref()
    }

    /// Update the draft name. Ignored while a create is in flight.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        match &mut self.draft {
            Some(draft) if !draft.saving => {
                draft.name = name.into();
                true
            }
            _ => false,
        }
    }

    /// Start committing the draft.
    ///
    /// Returns None when there is nothing to commit: no draft, a create
    /// already in flight, or a blank name.
    pub fn begin_commit(&mut self) -> Option<DraftCommit> {
        let draft = self.draft.as_mut()?;
        if draft.saving || draft.name.trim().is_empty() {
            return None;
        }
        draft.saving = true;
        draft.error = None;
        Some(DraftCommit {
            seq: draft.seq,
            name: draft.name.clone(),
            color: draft.color.clone(),
        })
    }

    /// The backend created the job. Hides the draft if it is the one committed.
    pub fn commit_succeeded(&mut self, seq: u64) -> bool {
        if self.is_current(seq) {
            self.draft = None;
            return true;
        }
        false
    }

    /// The backend rejected the job. The draft stays editable with the error.
    pub fn commit_failed(&mut self, seq: u64, message: impl Into<String>) -> bool {
        match &mut self.draft {
            Some(draft) if draft.seq == seq => {
                draft.saving = false;
                draft.error = Some(message.into());
                true
            }
            _ => false,
        }
    }

    /// Hide the draft without persisting anything
    pub fn discard(&mut self) -> bool {
        self.draft.take().is_some()
    }

    fn is_current(&self, seq: u64) -> bool {
        self.draft.as_ref().is_some_and(|d| d.seq == seq)
    }
}
