//! Event types for the TUI
//!
//! This module implements a dual-channel event architecture:
//! - InputEvent: Priority channel for user input (never dropped)
//! - DataEvent: Store results and ticks. Store results are never dropped;
//!   animation ticks may be.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

use crate::models::{Job, JobId};
use crate::tui::app::SaveTicket;

/// Input events from the terminal (priority channel - never dropped)
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Keyboard input
    Key(KeyEvent),
    /// Mouse input
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Results from the store worker and timer events
#[derive(Debug)]
pub enum DataEvent {
    /// Animation tick for spinners and success flashes
    AnimationTick,

    /// Full job list loaded (initial load or reload)
    JobsLoaded(Vec<Job>),

    /// Loading the job list failed
    LoadFailed(String),

    /// Rename or recolor completed
    FieldSaved {
        ticket: SaveTicket,
        result: Result<Job, String>,
    },

    /// Draft create completed
    JobCreated {
        draft_seq: u64,
        result: Result<Job, String>,
    },

    /// Archive completed
    JobArchived {
        job: JobId,
        result: Result<Job, String>,
    },
}

/// Result of processing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue running, UI needs redraw
    Continue,
    /// Continue running, no UI change needed
    Unchanged,
    /// Quit the application
    Quit,
}

/// Which key map applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into a row's name field
    Editing,
    /// Typing into the search bar
    Search,
    /// Choosing a swatch in the color picker
    Picker,
    /// Confirm dialog is open
    Confirm,
}

/// Key action mappings for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    PageUp,
    PageDown,

    // Actions
    Select,
    AddJob,
    ToggleColorPicker,
    Delete,
    QuickSearch,
    Refresh,

    // Text entry (name editing and search)
    TextChar(char),
    TextBackspace,
    TextClear,
    CursorLeft,
    CursorRight,
    /// Leave the field, committing it
    Blur,

    // Picker
    PickerPrev,
    PickerNext,

    // Confirm dialog
    Confirm,

    // UI
    ShowHelp,
    Escape,
    Quit,

    // Mouse actions
    MouseClick { row: u16, column: u16 },
    MouseScrollUp,
    MouseScrollDown,

    // Unknown/unhandled
    Unknown,
}

impl KeyAction {
    /// Map a mouse event to an action
    pub fn from_mouse_event(event: MouseEvent) -> Self {
        use crossterm::event::{MouseButton, MouseEventKind};

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => KeyAction::MouseClick {
                row: event.row,
                column: event.column,
            },
            MouseEventKind::ScrollUp => KeyAction::MouseScrollUp,
            MouseEventKind::ScrollDown => KeyAction::MouseScrollDown,
            _ => KeyAction::Unknown,
        }
    }

    /// Map a key event to an action based on current mode
    pub fn from_key_event(event: KeyEvent, mode: InputMode) -> Self {
        let KeyEvent {
            code, modifiers, ..
        } = event;
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        // Ctrl+C always quits
        if ctrl && code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match mode {
            InputMode::Editing => match code {
                KeyCode::Esc => KeyAction::Escape,
                KeyCode::Enter => KeyAction::Select,
                KeyCode::Tab | KeyCode::BackTab => KeyAction::Blur,
                KeyCode::Up => KeyAction::MoveUp,
                KeyCode::Down => KeyAction::MoveDown,
                KeyCode::Left => KeyAction::CursorLeft,
                KeyCode::Right => KeyAction::CursorRight,
                KeyCode::Backspace => KeyAction::TextBackspace,
                KeyCode::Char('u') if ctrl => KeyAction::TextClear,
                KeyCode::Char(c) if !ctrl => KeyAction::TextChar(c),
                _ => KeyAction::Unknown,
            },
            InputMode::Search => match code {
                KeyCode::Esc => KeyAction::Escape,
                KeyCode::Enter => KeyAction::Select,
                KeyCode::Backspace => KeyAction::TextBackspace,
                KeyCode::Char('u') if ctrl => KeyAction::TextClear,
                KeyCode::Char(c) if !ctrl => KeyAction::TextChar(c),
                _ => KeyAction::Unknown,
            },
            InputMode::Picker => match code {
                KeyCode::Esc => KeyAction::Escape,
                KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Select,
                KeyCode::Char('c') => KeyAction::ToggleColorPicker,
                KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => KeyAction::PickerPrev,
                KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => KeyAction::PickerNext,
                _ => KeyAction::Unknown,
            },
            InputMode::Confirm => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => KeyAction::Confirm,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => KeyAction::Escape,
                _ => KeyAction::Unknown,
            },
            InputMode::Normal => match code {
                KeyCode::Char('q') => KeyAction::Quit,

                // Ctrl+ combinations must come before bare character matches
                KeyCode::Char('d') if ctrl => KeyAction::PageDown,
                KeyCode::Char('u') if ctrl => KeyAction::PageUp,

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => KeyAction::MoveDown,
                KeyCode::Char('k') | KeyCode::Up => KeyAction::MoveUp,
                KeyCode::Char('g') | KeyCode::Home => KeyAction::MoveToTop,
                KeyCode::Char('G') | KeyCode::End => KeyAction::MoveToBottom,
                KeyCode::PageDown => KeyAction::PageDown,
                KeyCode::PageUp => KeyAction::PageUp,

                // Actions
                KeyCode::Enter | KeyCode::Char('i') => KeyAction::Select,
                KeyCode::Char('n') | KeyCode::Char('a') => KeyAction::AddJob,
                KeyCode::Char('c') => KeyAction::ToggleColorPicker,
                KeyCode::Char('d') | KeyCode::Delete => KeyAction::Delete,
                KeyCode::Char('/') => KeyAction::QuickSearch,
                KeyCode::Char('r') => KeyAction::Refresh,

                // Help
                KeyCode::Char('?') | KeyCode::F(1) => KeyAction::ShowHelp,
                KeyCode::Esc => KeyAction::Escape,

                _ => KeyAction::Unknown,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_action_quit() {
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('q')), InputMode::Normal), KeyAction::Quit);

        // q is text while editing, Ctrl+C still quits
        assert_eq!(
            KeyAction::from_key_event(key(KeyCode::Char('q')), InputMode::Editing),
            KeyAction::TextChar('q')
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(ctrl_c, InputMode::Editing), KeyAction::Quit);
    }

    #[test]
    fn test_key_action_navigation() {
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('j')), InputMode::Normal), KeyAction::MoveDown);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('k')), InputMode::Normal), KeyAction::MoveUp);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Down), InputMode::Editing), KeyAction::MoveDown);
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Tab), InputMode::Editing), KeyAction::Blur);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Enter), InputMode::Editing), KeyAction::Select);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Esc), InputMode::Editing), KeyAction::Escape);
    }

    #[test]
    fn test_ctrl_u_by_mode() {
        let event = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(event, InputMode::Search), KeyAction::TextClear);
        assert_eq!(KeyAction::from_key_event(event, InputMode::Normal), KeyAction::PageUp);
    }

    #[test]
    fn test_picker_and_confirm_keys() {
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('h')), InputMode::Picker), KeyAction::PickerPrev);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Right), InputMode::Picker), KeyAction::PickerNext);
        assert_eq!(
            KeyAction::from_key_event(key(KeyCode::Char('c')), InputMode::Picker),
            KeyAction::ToggleColorPicker
        );
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('y')), InputMode::Confirm), KeyAction::Confirm);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('d')), InputMode::Confirm), KeyAction::Unknown);
    }
}
