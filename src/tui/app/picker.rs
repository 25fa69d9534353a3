//! Color picker state
//!
//! At most one picker is open at a time. Transitions are pure: they take the
//! current state and return the next one, so opening a picker for another
//! row replaces the old one in a single assignment.

use crate::models::{HexColor, JobId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PickerState {
    #[default]
    Closed,
    OpenFor {
        job: JobId,
        /// Highlighted palette index
        cursor: usize,
    },
}

impl PickerState {
    /// Result of a swatch click.
    ///
    /// `Some(id)` opens the picker for that job (closing it when it was
    /// already open for the same job). `None` closes any open picker.
    #[must_use]
    pub fn toggled(&self, job: Option<&JobId>, initial_cursor: usize) -> Self {
        match job {
            None => PickerState::Closed,
            Some(id) if self.is_open_for(id) => PickerState::Closed,
            Some(id) => PickerState::OpenFor {
                job: id.clone(),
                cursor: initial_cursor,
            },
        }
    }

    /// Move the highlighted swatch by `delta`, wrapping around the palette
    #[must_use]
    pub fn with_cursor_moved(&self, delta: isize, palette_len: usize) -> Self {
        match self {
            PickerState::OpenFor { job, cursor } if palette_len > 0 => {
                let len = palette_len as isize;
                let next = (*cursor as isize + delta).rem_euclid(len) as usize;
                PickerState::OpenFor {
                    job: job.clone(),
                    cursor: next,
                }
            }
            other => other.clone(),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, PickerState::OpenFor { .. })
    }

    #[must_use]
    pub fn is_open_for(&self, job: &JobId) -> bool {
        matches!(self, PickerState::OpenFor { job: open, .. } if open == job)
    }

    #[must_use]
    pub fn open_job(&self) -> Option<&JobId> {
        match self {
            PickerState::OpenFor { job, .. } => Some(job),
            PickerState::Closed => None,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        match self {
            PickerState::OpenFor { cursor, .. } => Some(*cursor),
            PickerState::Closed => None,
        }
    }

    /// Palette color under the cursor
    #[must_use]
    pub fn highlighted<'p>(&self, palette: &'p [HexColor]) -> Option<&'p HexColor> {
        self.cursor().and_then(|i| palette.get(i))
    }
}
