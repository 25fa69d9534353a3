//! Application state types for the TUI
//!
//! This module contains the state that sits around the job list itself:
//! - Modal states (Help, Search, ConfirmArchive)
//! - Selection and navigation state (ListState)
//! - Inline name editing (EditSession)
//! - Feedback state for errors and transient notifications

use std::time::{Duration, Instant};

use crate::models::JobId;

use super::view::RowTarget;

// ============================================================================
// Toasts
// ============================================================================

/// Transient status-bar message
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub success: bool,
    pub timestamp: Instant,
}

impl Toast {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
            timestamp: Instant::now(),
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
            timestamp: Instant::now(),
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.timestamp.elapsed() < Duration::from_secs(3)
    }
}

// ============================================================================
// List Navigation State
// ============================================================================

/// List state with selection and scroll tracking
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
    pub scroll_offset: usize,
    pub visible_count: usize,
}

impl ListState {
    pub fn clamp(&mut self, list_len: usize) {
        if list_len == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
        } else {
            self.selected = self.selected.min(list_len - 1);
            if self.selected < self.scroll_offset {
                self.scroll_offset = self.selected;
            } else if self.visible_count > 0
                && self.selected >= self.scroll_offset + self.visible_count
            {
                self.scroll_offset = self.selected.saturating_sub(self.visible_count - 1);
            }
        }
    }

    pub fn select(&mut self, index: usize, list_len: usize) {
        self.selected = index;
        self.clamp(list_len);
    }

    pub fn move_up(&mut self, list_len: usize) {
        if self.selected > 0 {
            self.selected -= 1;
            self.clamp(list_len);
        }
    }

    pub fn move_down(&mut self, list_len: usize) {
        if list_len > 0 && self.selected < list_len - 1 {
            self.selected += 1;
            self.clamp(list_len);
        }
    }

    pub fn move_to_top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn move_to_bottom(&mut self, list_len: usize) {
        if list_len > 0 {
            self.selected = list_len - 1;
            if self.visible_count > 0 {
                self.scroll_offset = list_len.saturating_sub(self.visible_count);
            }
        }
    }

    /// Scroll the viewport without moving past the list ends
    pub fn scroll_by(&mut self, delta: isize, list_len: usize) {
        let max_offset = list_len.saturating_sub(self.visible_count.max(1));
        let offset = self.scroll_offset.saturating_add_signed(delta).min(max_offset);
        self.scroll_offset = offset;
        if self.selected < offset {
            self.selected = offset;
        } else if self.visible_count > 0 && self.selected >= offset + self.visible_count {
            self.selected = offset + self.visible_count - 1;
        }
        self.selected = self.selected.min(list_len.saturating_sub(1));
    }
}

// ============================================================================
// Inline Editing
// ============================================================================

/// Name editing in progress on one row.
///
/// The edited text lives in the job (or draft) itself; this keeps what is
/// needed to revert and to skip commits that changed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub target: RowTarget,
    pub original: String,
    /// Cursor position in characters
    pub cursor: usize,
}

impl EditSession {
    pub fn new(target: RowTarget, original: String) -> Self {
        let cursor = original.chars().count();
        Self {
            target,
            original,
            cursor,
        }
    }
}

/// Insert a character at a character cursor position
pub fn insert_char(text: &mut String, cursor: &mut usize, c: char) {
    let byte = byte_index(text, *cursor);
    text.insert(byte, c);
    *cursor += 1;
}

/// Remove the character before the cursor
pub fn backspace(text: &mut String, cursor: &mut usize) -> bool {
    if *cursor == 0 {
        return false;
    }
    let byte = byte_index(text, *cursor - 1);
    text.remove(byte);
    *cursor -= 1;
    true
}

fn byte_index(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

// ============================================================================
// Modal State
// ============================================================================

/// Modal overlay state - only one modal can be active at a time.
///
/// The search query itself lives on the app so the list narrows while the
/// user types; the modal only tracks the cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    None,
    Help,
    Search {
        cursor: usize,
    },
    ConfirmArchive {
        job: JobId,
        name: String,
    },
}

impl ModalState {
    #[must_use]
    pub fn is_searching(&self) -> bool {
        matches!(self, ModalState::Search { .. })
    }
}

// ============================================================================
// Feedback State
// ============================================================================

/// Unified feedback state for errors, warnings, and transient messages
#[derive(Debug)]
pub struct FeedbackState {
    last_error: Option<(String, Instant)>,
    error_display_duration: Duration,
    pub config_warnings: Vec<String>,
    toast: Option<Toast>,
}

impl FeedbackState {
    /// Create a new FeedbackState with config warnings
    pub fn new(config_warnings: Vec<String>) -> Self {
        Self {
            last_error: None,
            error_display_duration: Duration::from_secs(5),
            config_warnings,
            toast: None,
        }
    }

    /// Set an error message to display
    pub fn set_error(&mut self, msg: String) {
        self.last_error = Some((msg, Instant::now()));
    }

    /// Check if error should still be displayed
    #[must_use]
    pub fn should_show_error(&self) -> bool {
        self.last_error
            .as_ref()
            .map(|(_, t)| t.elapsed() < self.error_display_duration)
            .unwrap_or(false)
    }

    /// Get the current error message if it should be shown
    #[must_use]
    pub fn current_error(&self) -> Option<&str> {
        if self.should_show_error() {
            self.last_error.as_ref().map(|(msg, _)| msg.as_str())
        } else {
            None
        }
    }

    pub fn set_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    /// Get current toast if visible
    #[must_use]
    pub fn current_toast(&self) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| t.is_visible())
    }

    pub fn clear_toast(&mut self) {
        self.toast = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_state_navigation() {
        let mut state = ListState {
            visible_count: 10,
            ..Default::default()
        };

        state.move_down(5);
        assert_eq!(state.selected, 1);

        state.move_to_bottom(5);
        assert_eq!(state.selected, 4);

        state.move_to_top();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_scroll_keeps_selection_visible() {
        let mut state = ListState {
            visible_count: 3,
            ..Default::default()
        };

        state.scroll_by(5, 10);
        assert_eq!(state.scroll_offset, 5);
        assert_eq!(state.selected, 5);

        state.scroll_by(50, 10);
        assert_eq!(state.scroll_offset, 7);

        state.scroll_by(-50, 10);
        assert_eq!(state.scroll_offset, 0);
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn test_text_editing_handles_multibyte() {
        let mut text = String::from("Caf");
        let mut cursor = 3;
        insert_char(&mut text, &mut cursor, 'é');
        assert_eq!(text, "Café");
        assert_eq!(cursor, 4);

        assert!(backspace(&mut text, &mut cursor));
        assert_eq!(text, "Caf");

        cursor = 0;
        assert!(!backspace(&mut text, &mut cursor));
    }

    #[test]
    fn test_feedback_error_visible() {
        let mut feedback = FeedbackState::new(vec!["bad palette".to_string()]);
        assert!(feedback.current_error().is_none());

        feedback.set_error("load failed".to_string());
        assert_eq!(feedback.current_error(), Some("load failed"));
        assert_eq!(feedback.config_warnings.len(), 1);
    }
}
