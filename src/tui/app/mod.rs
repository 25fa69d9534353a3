//! Application state and core logic for the TUI
//!
//! This module contains the main App struct and all associated state management.
//! The architecture follows a TEA-inspired pattern with mutable state and method-based updates:
//! key and mouse input becomes [`KeyAction`]s, row interactions become
//! [`ListIntent`]s handled by [`App::dispatch`], and persistence happens on the
//! store worker whose results come back through [`App::handle_data`].

// Submodules
mod draft;
mod filter;
mod focus;
mod picker;
mod save_state;
mod state;
mod view;

// Re-export public types
pub use draft::{DraftCommit, NewJobDraft, NewJobSlot};
pub use filter::{job_matches_query, query_jobs, QueriedJobs};
pub use focus::{MountEffects, RowKey};
pub use picker::PickerState;
pub use save_state::{JobField, RowStatus, SaveKey, SaveState, SaveTicket};
pub use state::{EditSession, FeedbackState, ListState, ModalState, Toast};
pub use view::{
    add_row_activated, build_job_list, JobListModel, ListIntent, RowModel, RowTarget, ViewInput,
    ViewRow,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tokio::sync::mpsc;

use crate::models::{default_palette, AppConfig, HexColor, JobCollection, JobId};
use crate::tui::event::{DataEvent, EventResult, InputEvent, InputMode, KeyAction};
use crate::tui::i18n::{Catalog, MessageKey, Translate};
use crate::tui::runtime::StoreRequest;
use crate::tui::theme::Theme;
use crate::tui::ui::{TABLE_BODY_TOP, VIEWPORT_CHROME_ROWS};

/// Rows scrolled per mouse wheel step
const SCROLL_STEP: isize = 3;

/// Main application state
///
/// Field groups:
/// - `jobs`, `query`, `picker`, `save`, `draft`: the job list state projected by `build_job_list`
/// - `edit`, `mounts`, `list_state`: focus and selection
/// - `modal`, `feedback`: overlays and status messages
/// - `theme`, `catalog`: injected presentation dependencies
pub struct App {
    // Lifecycle
    pub running: bool,
    /// First load finished (successfully or not)
    pub loaded: bool,

    // Job list
    pub jobs: JobCollection,
    pub query: String,
    pub picker: PickerState,
    pub save: SaveState,
    pub draft: NewJobSlot,

    // Focus and selection
    pub mounts: MountEffects,
    pub edit: Option<EditSession>,
    pub list_state: ListState,

    // Overlays
    pub modal: ModalState,
    pub feedback: FeedbackState,
    pub spinner_frame: usize,

    // Configuration
    pub team_name: String,
    pub palette: Vec<HexColor>,
    pub confirm_archive: bool,
    pub name_max_length: usize,

    // Presentation
    pub theme: Theme,
    pub catalog: Box<dyn Translate>,

    // Communication
    store_tx: mpsc::UnboundedSender<StoreRequest>,
    animation: Arc<AtomicBool>,
}

impl App {
    /// Create a new App from validated configuration.
    ///
    /// The theme and message catalogue are derived from the configuration;
    /// use [`App::with_theme`] and [`App::with_catalog`] to inject others.
    pub fn new(
        config: &AppConfig,
        mut config_warnings: Vec<String>,
        store_tx: mpsc::UnboundedSender<StoreRequest>,
    ) -> Self {
        let (catalog, catalog_warnings) = Catalog::from_overrides(&config.strings);
        config_warnings.extend(catalog_warnings);

        let mut palette = config.palette();
        if palette.is_empty() {
            palette = default_palette();
        }

        Self {
            running: true,
            loaded: false,

            jobs: JobCollection::new(),
            query: String::new(),
            picker: PickerState::Closed,
            save: SaveState::new(Duration::from_millis(config.behavior.success_flash_ms)),
            draft: NewJobSlot::new(),

            mounts: MountEffects::new(),
            edit: None,
            list_state: ListState::default(),

            modal: ModalState::None,
            feedback: FeedbackState::new(config_warnings),
            spinner_frame: 0,

            team_name: config.store.team_name.clone(),
            palette,
            confirm_archive: config.behavior.confirm_archive,
            name_max_length: config.display.name_max_length,

            theme: Theme::from_name(&config.display.theme),
            catalog: Box::new(catalog),

            store_tx,
            animation: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_catalog(mut self, catalog: Box<dyn Translate>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Flag read by the animation tick task
    pub fn animation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.animation)
    }

    /// Size the list viewport from the terminal height
    pub fn set_viewport_height(&mut self, height: u16) {
        self.list_state.visible_count = height.saturating_sub(VIEWPORT_CHROME_ROWS).max(1) as usize;
        let len = self.list_model().len();
        self.list_state.clamp(len);
    }

    // ------------------------------------------------------------------------
    // View projection
    // ------------------------------------------------------------------------

    pub fn view_input(&self) -> ViewInput<'_> {
        ViewInput {
            jobs: &self.jobs,
            query: &self.query,
            picker: &self.picker,
            save: &self.save,
            draft: &self.draft,
        }
    }

    pub fn list_model(&self) -> JobListModel {
        build_job_list(&self.view_input())
    }

    /// Which key map applies right now
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match &self.modal {
            ModalState::ConfirmArchive { .. } => InputMode::Confirm,
            ModalState::Search { .. } => InputMode::Search,
            _ if self.picker.is_open() => InputMode::Picker,
            _ if self.edit.is_some() => InputMode::Editing,
            _ => InputMode::Normal,
        }
    }

    /// Whether `target` is the row being edited
    #[must_use]
    pub fn is_editing(&self, target: &RowTarget) -> bool {
        self.edit.as_ref().is_some_and(|e| &e.target == target)
    }

    /// Get the current error message if it should be shown
    #[must_use]
    pub fn current_error(&self) -> Option<&str> {
        self.feedback.current_error()
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Handle an input event
    pub fn handle_input(&mut self, event: InputEvent) -> EventResult {
        let result = match event {
            InputEvent::Key(key_event) => {
                let action = KeyAction::from_key_event(key_event, self.input_mode());
                self.handle_action(action)
            }
            InputEvent::Resize(_, height) => {
                self.set_viewport_height(height);
                EventResult::Continue
            }
            InputEvent::Mouse(mouse_event) => {
                let action = KeyAction::from_mouse_event(mouse_event);
                self.handle_action(action)
            }
        };
        self.after_update();
        result
    }

    /// Handle a key action
    fn handle_action(&mut self, action: KeyAction) -> EventResult {
        // Help overlay takes priority
        if matches!(self.modal, ModalState::Help) {
            return match action {
                KeyAction::Escape | KeyAction::ShowHelp | KeyAction::Quit => {
                    self.modal = ModalState::None;
                    EventResult::Continue
                }
                _ => EventResult::Unchanged,
            };
        }

        if let KeyAction::Quit = action {
            self.running = false;
            return EventResult::Quit;
        }

        match self.input_mode() {
            InputMode::Confirm => self.handle_confirm_action(action),
            InputMode::Search => self.handle_search_action(action),
            InputMode::Picker => self.handle_picker_action(action),
            InputMode::Editing => self.handle_edit_action(action),
            InputMode::Normal => self.handle_normal_action(action),
        }
    }

    fn handle_normal_action(&mut self, action: KeyAction) -> EventResult {
        // Handle navigation actions first (common pattern: call method, return Continue)
        if let Some(result) = self.handle_navigation(&action) {
            return result;
        }

        let model = self.list_model();
        let selected = model.row(self.list_state.selected).cloned();

        match action {
            KeyAction::Select => match selected {
                Some(ViewRow::AddNewJob) => self.activate_add_row(),
                Some(ViewRow::Job(row)) | Some(ViewRow::Draft(row)) => {
                    self.start_edit(row.target);
                    EventResult::Continue
                }
                None => EventResult::Unchanged,
            },
            KeyAction::AddJob => self.activate_add_row(),
            KeyAction::ToggleColorPicker => {
                match selected.as_ref().and_then(ViewRow::model).and_then(RowModel::swatch_intent) {
                    Some(intent) => self.dispatch(intent),
                    None => EventResult::Unchanged,
                }
            }
            KeyAction::Delete => match selected.as_ref().and_then(ViewRow::model) {
                Some(row) => self.dispatch(row.delete_intent()),
                None => EventResult::Unchanged,
            },
            KeyAction::QuickSearch => {
                self.modal = ModalState::Search {
                    cursor: self.query.chars().count(),
                };
                EventResult::Continue
            }
            KeyAction::Refresh => {
                self.send(StoreRequest::Load);
                EventResult::Continue
            }
            KeyAction::ShowHelp => {
                self.modal = ModalState::Help;
                EventResult::Continue
            }
            KeyAction::Escape => {
                if !self.query.is_empty() {
                    self.set_query(String::new());
                    EventResult::Continue
                } else if self.feedback.current_toast().is_some() {
                    self.feedback.clear_toast();
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            KeyAction::MouseClick { row, .. } => self.handle_mouse_click(row),
            _ => EventResult::Unchanged,
        }
    }

    /// Handle navigation actions (returns Some if action was handled)
    fn handle_navigation(&mut self, action: &KeyAction) -> Option<EventResult> {
        let len = self.list_model().len();
        match action {
            KeyAction::MoveUp => self.list_state.move_up(len),
            KeyAction::MoveDown => self.list_state.move_down(len),
            KeyAction::MoveToTop => self.list_state.move_to_top(),
            KeyAction::MoveToBottom => self.list_state.move_to_bottom(len),
            KeyAction::PageUp => self.page(len, -1),
            KeyAction::PageDown => self.page(len, 1),
            KeyAction::MouseScrollUp => self.list_state.scroll_by(-SCROLL_STEP, len),
            KeyAction::MouseScrollDown => self.list_state.scroll_by(SCROLL_STEP, len),
            _ => return None,
        }
        Some(EventResult::Continue)
    }

    fn page(&mut self, len: usize, direction: isize) {
        let jump = (self.list_state.visible_count.max(2) / 2) as isize;
        let target = self.list_state.selected.saturating_add_signed(jump * direction);
        self.list_state.select(target, len);
    }

    /// Handle mouse click to select a row (and activate the add row)
    fn handle_mouse_click(&mut self, row: u16) -> EventResult {
        if row < TABLE_BODY_TOP {
            return EventResult::Unchanged;
        }

        let model = self.list_model();
        let index = self.list_state.scroll_offset + (row - TABLE_BODY_TOP) as usize;
        let Some(clicked) = model.row(index) else {
            return EventResult::Unchanged;
        };

        self.list_state.select(index, model.len());
        if matches!(clicked, ViewRow::AddNewJob) {
            self.activate_add_row();
        }
        EventResult::Continue
    }

    fn handle_confirm_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::Escape => {
                self.modal = ModalState::None;
                EventResult::Continue
            }
            KeyAction::Confirm => {
                if let ModalState::ConfirmArchive { job, .. } = std::mem::take(&mut self.modal) {
                    self.archive(job);
                }
                EventResult::Continue
            }
            _ => EventResult::Unchanged,
        }
    }

    /// Live search: every keystroke narrows the list
    fn handle_search_action(&mut self, action: KeyAction) -> EventResult {
        let ModalState::Search { cursor } = &self.modal else {
            return EventResult::Unchanged;
        };
        let mut cursor = *cursor;
        let mut query = self.query.clone();

        match action {
            KeyAction::Escape => {
                self.modal = ModalState::None;
                self.set_query(String::new());
                return EventResult::Continue;
            }
            KeyAction::Select => {
                self.modal = ModalState::None;
                return EventResult::Continue;
            }
            KeyAction::TextChar(c) => state::insert_char(&mut query, &mut cursor, c),
            KeyAction::TextBackspace => {
                if !state::backspace(&mut query, &mut cursor) {
                    return EventResult::Unchanged;
                }
            }
            KeyAction::TextClear => {
                query.clear();
                cursor = 0;
            }
            _ => return EventResult::Unchanged,
        }

        self.modal = ModalState::Search { cursor };
        self.set_query(query);
        EventResult::Continue
    }

    fn handle_picker_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::PickerPrev => {
                self.picker = self.picker.with_cursor_moved(-1, self.palette.len());
                EventResult::Continue
            }
            KeyAction::PickerNext => {
                self.picker = self.picker.with_cursor_moved(1, self.palette.len());
                EventResult::Continue
            }
            KeyAction::Select => {
                let chosen = self
                    .picker
                    .highlighted(&self.palette)
                    .cloned()
                    .zip(self.picker.open_job().cloned());
                match chosen {
                    Some((color, job)) => self.dispatch(ListIntent::ColorChosen { color, job }),
                    None => EventResult::Unchanged,
                }
            }
            KeyAction::ToggleColorPicker => {
                let job = self.picker.open_job().cloned();
                self.dispatch(ListIntent::ColorSwatchClicked { job })
            }
            KeyAction::Escape | KeyAction::MouseClick { .. } => {
                // Clicking outside the popover closes it
                self.dispatch(ListIntent::ColorSwatchClicked { job: None })
            }
            _ => EventResult::Unchanged,
        }
    }

    fn handle_edit_action(&mut self, action: KeyAction) -> EventResult {
        let Some(target) = self.edit.as_ref().map(|e| e.target.clone()) else {
            return EventResult::Unchanged;
        };

        match action {
            KeyAction::TextChar(c) => self.edit_text(|name, cursor| {
                state::insert_char(name, cursor, c);
                true
            }),
            KeyAction::TextBackspace => self.edit_text(state::backspace),
            KeyAction::TextClear => self.edit_text(|name, cursor| {
                let changed = !name.is_empty();
                name.clear();
                *cursor = 0;
                changed
            }),
            KeyAction::CursorLeft => self.move_edit_cursor(-1),
            KeyAction::CursorRight => self.move_edit_cursor(1),
            KeyAction::Select => self.dispatch(ListIntent::NameKeyPressed {
                target,
                key: KeyCode::Enter,
            }),
            KeyAction::Blur => self.dispatch(ListIntent::NameBlurred { target }),
            KeyAction::Escape => self.revert_edit(),
            KeyAction::MoveUp | KeyAction::MoveDown | KeyAction::MouseClick { .. } => {
                self.dispatch(ListIntent::NameBlurred { target });
                self.handle_normal_action(action);
                EventResult::Continue
            }
            KeyAction::MouseScrollUp | KeyAction::MouseScrollDown => {
                self.handle_navigation(&action).unwrap_or(EventResult::Unchanged)
            }
            _ => EventResult::Unchanged,
        }
    }

    // ------------------------------------------------------------------------
    // Inline editing
    // ------------------------------------------------------------------------

    fn target_name(&self, target: &RowTarget) -> Option<String> {
        match target {
            RowTarget::Job(id) => self.jobs.get(id).map(|job| job.name.clone()),
            RowTarget::Draft => self.draft.draft().map(|d| d.name.clone()),
        }
    }

    fn start_edit(&mut self, target: RowTarget) {
        if self.is_editing(&target) {
            return;
        }
        if let Some(current) = self.edit.as_ref().map(|e| e.target.clone()) {
            self.dispatch(ListIntent::NameBlurred { target: current });
        }
        if let Some(original) = self.target_name(&target) {
            self.picker = PickerState::Closed;
            self.edit = Some(EditSession::new(target, original));
        }
    }

    /// Apply a text operation to the field being edited
    fn edit_text<F>(&mut self, op: F) -> EventResult
    where
        F: FnOnce(&mut String, &mut usize) -> bool,
    {
        let Some(session) = self.edit.as_ref() else {
            return EventResult::Unchanged;
        };
        let target = session.target.clone();
        let mut cursor = session.cursor;

        if target == RowTarget::Draft && self.draft.draft().is_some_and(|d| d.saving) {
            return EventResult::Unchanged;
        }
        let Some(mut name) = self.target_name(&target) else {
            return EventResult::Unchanged;
        };
        if !op(&mut name, &mut cursor) {
            return EventResult::Unchanged;
        }

        if let Some(session) = self.edit.as_mut() {
            session.cursor = cursor;
        }
        self.dispatch(ListIntent::NameChanged { target, name })
    }

    fn move_edit_cursor(&mut self, delta: isize) -> EventResult {
        let Some(target) = self.edit.as_ref().map(|e| e.target.clone()) else {
            return EventResult::Unchanged;
        };
        let len = self.target_name(&target).map(|n| n.chars().count()).unwrap_or(0);
        if let Some(session) = self.edit.as_mut() {
            session.cursor = session.cursor.saturating_add_signed(delta).min(len);
        }
        EventResult::Continue
    }

    /// Leave the field, restoring the name it had when editing started
    fn revert_edit(&mut self) -> EventResult {
        let Some(session) = self.edit.take() else {
            return EventResult::Unchanged;
        };
        match &session.target {
            RowTarget::Job(id) => {
                if let Some(job) = self.jobs.get_mut(id) {
                    job.name = session.original;
                }
            }
            RowTarget::Draft => {
                self.draft.set_name(session.original);
            }
        }
        EventResult::Continue
    }

    /// End the edit session for `target` and persist the edited name
    fn commit_name(&mut self, target: &RowTarget) {
        let original = match self.edit.take() {
            Some(session) if &session.target == target => Some(session.original),
            other => {
                self.edit = other;
                None
            }
        };

        match target {
            RowTarget::Job(id) => {
                let Some(job) = self.jobs.get(id) else {
                    return;
                };
                if job.archived || original.as_deref() == Some(job.name.as_str()) {
                    return;
                }
                let name = job.name.clone();
                let ticket = self.save.begin(SaveKey::new(id.clone(), JobField::Name));
                self.send(StoreRequest::Rename { ticket, name });
            }
            RowTarget::Draft => {
                if let Some(commit) = self.draft.begin_commit() {
                    self.send(StoreRequest::Create {
                        draft_seq: commit.seq,
                        name: commit.name,
                        color: commit.color,
                    });
                }
            }
        }
    }

    /// Put the cursor back in the draft after a rejected create
    fn refocus_draft(&mut self) {
        let Some(name) = self.target_name(&RowTarget::Draft) else {
            return;
        };
        let model = self.list_model();
        if let Some(index) = model.rows.iter().position(|row| matches!(row, ViewRow::Draft(_))) {
            self.list_state.select(index, model.len());
        }
        self.edit = Some(EditSession::new(RowTarget::Draft, name));
    }

    // ------------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------------

    fn activate_add_row(&mut self) -> EventResult {
        match add_row_activated(self.draft.is_visible()) {
            Some(intent) => self.dispatch(intent),
            None => EventResult::Unchanged,
        }
    }

    /// Handle a list intent
    pub fn dispatch(&mut self, intent: ListIntent) -> EventResult {
        tracing::debug!(?intent, "list intent");

        match intent {
            ListIntent::NameChanged { target, name } => {
                let changed = match &target {
                    RowTarget::Job(id) => match self.jobs.get_mut(id) {
                        Some(job) => {
                            job.name = name;
                            true
                        }
                        None => false,
                    },
                    RowTarget::Draft => self.draft.set_name(name),
                };
                if changed {
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            ListIntent::NameBlurred { target } => {
                self.commit_name(&target);
                EventResult::Continue
            }
            ListIntent::NameKeyPressed { target, key } => {
                if key == KeyCode::Enter {
                    self.commit_name(&target);
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            ListIntent::ColorSwatchClicked { job } => {
                if let Some(id) = &job
                    && !self.jobs.get(id).is_some_and(|j| !j.archived)
                {
                    return EventResult::Unchanged;
                }
                if let Some(current) = self.edit.as_ref().map(|e| e.target.clone()) {
                    self.commit_name(&current);
                }
                let initial = job
                    .as_ref()
                    .and_then(|id| self.jobs.get(id))
                    .and_then(|j| self.palette.iter().position(|c| c == &j.color))
                    .unwrap_or(0);
                self.picker = self.picker.toggled(job.as_ref(), initial);
                EventResult::Continue
            }
            ListIntent::ColorChosen { color, job } => {
                self.picker = PickerState::Closed;
                if let Some(existing) = self.jobs.get_mut(&job)
                    && !existing.archived
                    && existing.color != color
                {
                    existing.color = color.clone();
                    let ticket = self.save.begin(SaveKey::new(job, JobField::Color));
                    self.send(StoreRequest::Recolor { ticket, color });
                }
                EventResult::Continue
            }
            ListIntent::DeleteClicked { job } => {
                let Some(name) = self.jobs.get(&job).map(|j| j.name.clone()) else {
                    return EventResult::Unchanged;
                };
                if self.confirm_archive {
                    self.modal = ModalState::ConfirmArchive { job, name };
                } else {
                    self.archive(job);
                }
                EventResult::Continue
            }
            ListIntent::AddNewJobClicked => {
                if let Some(current) = self.edit.as_ref().map(|e| e.target.clone()) {
                    self.commit_name(&current);
                }
                let Some(color) = self.next_draft_color() else {
                    return EventResult::Unchanged;
                };
                if self.draft.open(color) {
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            ListIntent::NewJobDiscarded => {
                if self.is_editing(&RowTarget::Draft) {
                    self.edit = None;
                }
                if self.draft.discard() {
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
        }
    }

    /// Color for a new draft: palette entries in turn
    fn next_draft_color(&self) -> Option<HexColor> {
        if self.palette.is_empty() {
            return None;
        }
        let index = self.jobs.active_count() % self.palette.len();
        self.palette.get(index).cloned()
    }

    /// Hide a job and ask the store to archive it
    fn archive(&mut self, id: JobId) {
        if self.picker.is_open_for(&id) {
            self.picker = PickerState::Closed;
        }
        if self.is_editing(&RowTarget::Job(id.clone())) {
            self.edit = None;
        }
        if let Some(job) = self.jobs.get_mut(&id) {
            job.archived = true;
        }
        self.save.forget(&id);
        self.send(StoreRequest::Archive { job: id });
    }

    fn set_query(&mut self, query: String) {
        self.query = query;
        let len = self.list_model().len();
        self.list_state.clamp(len);
    }

    fn send(&self, request: StoreRequest) {
        tracing::debug!(?request, "queueing store request");
        if self.store_tx.send(request).is_err() {
            tracing::warn!("Store worker is gone; request dropped");
        }
    }

    // ------------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------------

    /// Handle a data event
    pub fn handle_data(&mut self, event: DataEvent) -> EventResult {
        let result = match event {
            DataEvent::JobsLoaded(jobs) => {
                tracing::info!(count = jobs.len(), "jobs loaded");
                self.jobs.replace(jobs);
                self.loaded = true;

                if let Some(open) = self.picker.open_job()
                    && !self.jobs.get(open).is_some_and(|j| !j.archived)
                {
                    self.picker = PickerState::Closed;
                }
                if matches!(self.edit.as_ref().map(|e| &e.target), Some(RowTarget::Job(_))) {
                    self.edit = None;
                }
                let len = self.list_model().len();
                self.list_state.clamp(len);
                EventResult::Continue
            }
            DataEvent::LoadFailed(error) => {
                tracing::warn!("Loading jobs failed: {}", error);
                self.loaded = true;
                self.feedback.set_error(error);
                EventResult::Continue
            }
            DataEvent::FieldSaved { ticket, result } => {
                let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
                if !self.save.finish(&ticket, outcome, Instant::now()) {
                    tracing::debug!(job = %ticket.key.job, "ignoring superseded save result");
                    return EventResult::Unchanged;
                }
                if let Ok(saved) = result {
                    let editing = self.is_editing(&RowTarget::Job(saved.id.clone()));
                    if let Some(job) = self.jobs.get_mut(&saved.id) {
                        match ticket.key.field {
                            JobField::Name if !editing => job.name = saved.name,
                            JobField::Color => job.color = saved.color,
                            JobField::Name => {}
                        }
                    }
                }
                EventResult::Continue
            }
            DataEvent::JobCreated { draft_seq, result } => match result {
                Ok(job) => {
                    if self.draft.commit_succeeded(draft_seq) && self.is_editing(&RowTarget::Draft) {
                        self.edit = None;
                    }
                    self.jobs.upsert(job);
                    self.feedback
                        .set_toast(Toast::success(self.catalog.t(MessageKey::JobAdded).to_string()));
                    EventResult::Continue
                }
                Err(error) => {
                    if !self.draft.commit_failed(draft_seq, error) {
                        return EventResult::Unchanged;
                    }
                    if self.edit.is_none() {
                        self.refocus_draft();
                    }
                    EventResult::Continue
                }
            },
            DataEvent::JobArchived { job, result } => match result {
                Ok(archived) => {
                    self.jobs.upsert(archived);
                    self.save.forget(&job);
                    self.feedback
                        .set_toast(Toast::success(self.catalog.t(MessageKey::JobArchived).to_string()));
                    EventResult::Continue
                }
                Err(error) => {
                    tracing::warn!(job = %job, "archive failed: {}", error);
                    if let Some(existing) = self.jobs.get_mut(&job) {
                        existing.archived = false;
                    }
                    self.feedback.set_toast(Toast::failure(error));
                    EventResult::Continue
                }
            },
            DataEvent::AnimationTick => {
                let expired = self.save.expire(Instant::now());
                let spinning = self.save.has_pending() || self.draft.draft().is_some_and(|d| d.saving);
                if spinning || !self.loaded {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
                if expired || spinning || !self.loaded || self.feedback.current_toast().is_some() {
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
        };
        self.after_update();
        result
    }

    /// Post-update bookkeeping: mount effects, selection bounds, tick flag
    fn after_update(&mut self) {
        self.sync_mounts();

        let animating = !self.loaded
            || self.save.has_pending()
            || self.save.has_flashes()
            || self.draft.draft().is_some_and(|d| d.saving)
            || self.feedback.current_toast().is_some()
            || self.feedback.should_show_error();
        self.animation.store(animating, Ordering::Relaxed);
    }

    /// Mount rows on screen and run their autofocus effect once
    fn sync_mounts(&mut self) {
        let model = self.list_model();
        let mut focus = None;
        for (index, row) in model.rows.iter().enumerate() {
            if let Some(row) = row.model()
                && self.mounts.mount(row.key.clone(), row.is_new)
            {
                focus = Some((index, row.target.clone()));
            }
        }
        self.mounts.retain_live(model.row_keys());

        if let Some((index, target)) = focus {
            self.list_state.select(index, model.len());
            self.start_edit(target);
        } else {
            self.list_state.clamp(model.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn job(id: &str, name: &str, color: &str) -> Job {
        Job::new(JobId::new(id), name, HexColor::parse(color).unwrap())
    }

    /// Cashier, Manager (archived), Cook
    fn app() -> (App, mpsc::UnboundedReceiver<StoreRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = App::new(&AppConfig::default(), Vec::new(), tx);
        let mut manager = job("j2", "Manager", "00ff00");
        manager.archived = true;
        app.handle_data(DataEvent::JobsLoaded(vec![
            job("j1", "Cashier", "ff0000"),
            manager,
            job("j3", "Cook", "0693e3"),
        ]));
        (app, rx)
    }

    fn press(app: &mut App, code: KeyCode) -> EventResult {
        app.handle_input(InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn row_names(app: &App) -> Vec<String> {
        app.list_model()
            .rows
            .iter()
            .map(|row| match row {
                ViewRow::Job(m) => m.name.clone(),
                ViewRow::Draft(m) => format!("draft:{}", m.name),
                ViewRow::AddNewJob => "+".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_new_job_draft_commits_once_on_blur() {
        let (mut app, mut rx) = app();

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(row_names(&app), ["Cashier", "Cook", "draft:", "+"]);
        assert!(app.is_editing(&RowTarget::Draft), "draft is focused on mount");
        assert_eq!(app.list_state.selected, 2);

        type_text(&mut app, "Baker");
        press(&mut app, KeyCode::Tab);

        let seq = match rx.try_recv().unwrap() {
            StoreRequest::Create { draft_seq, name, .. } => {
                assert_eq!(name, "Baker");
                draft_seq
            }
            other => panic!("unexpected request: {other:?}"),
        };
        assert!(rx.try_recv().is_err(), "commit fires exactly once");

        app.handle_data(DataEvent::JobCreated {
            draft_seq: seq,
            result: Ok(job("j4", "Baker", "ff6900")),
        });
        assert!(!app.draft.is_visible());
        assert_eq!(row_names(&app), ["Cashier", "Cook", "Baker", "+"]);
    }

    #[test]
    fn test_enter_then_blur_does_not_commit_twice() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Baker");
        press(&mut app, KeyCode::Enter);
        app.dispatch(ListIntent::NameBlurred { target: RowTarget::Draft });

        assert!(matches!(rx.try_recv(), Ok(StoreRequest::Create { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_add_is_idempotent_and_keeps_draft() {
        let (mut app, _rx) = app();
        app.dispatch(ListIntent::AddNewJobClicked);
        app.draft.set_name("Cook's helper");
        let seq = app.draft.draft().unwrap().seq;

        assert_eq!(app.dispatch(ListIntent::AddNewJobClicked), EventResult::Unchanged);
        let draft = app.draft.draft().unwrap();
        assert_eq!(draft.seq, seq);
        assert_eq!(draft.name, "Cook's helper");
    }

    #[test]
    fn test_discard_draft_sends_nothing() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Temp");
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('d'));

        assert!(!app.draft.is_visible());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_blank_draft_commit_is_noop() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);
        assert!(app.draft.is_visible());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_create_keeps_draft_focused() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Cashier");
        press(&mut app, KeyCode::Enter);
        assert!(!app.is_editing(&RowTarget::Draft));

        let Ok(StoreRequest::Create { draft_seq, .. }) = rx.try_recv() else {
            panic!("expected a create request");
        };
        app.handle_data(DataEvent::JobCreated {
            draft_seq,
            result: Err("A job named 'Cashier' already exists".to_string()),
        });

        assert!(app.is_editing(&RowTarget::Draft));
        assert_eq!(app.list_state.selected, 2);
        type_text(&mut app, " 2");
        press(&mut app, KeyCode::Enter);
        match rx.try_recv() {
            Ok(StoreRequest::Create { name, .. }) => assert_eq!(name, "Cashier 2"),
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_rename_shows_spinner_then_saved() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.is_editing(&RowTarget::Job(JobId::new("j1"))));

        type_text(&mut app, "s");
        press(&mut app, KeyCode::Enter);

        let ticket = match rx.try_recv().unwrap() {
            StoreRequest::Rename { ticket, name } => {
                assert_eq!(name, "Cashiers");
                ticket
            }
            other => panic!("unexpected request: {other:?}"),
        };
        let status = |app: &App| app.list_model().rows[0].model().unwrap().status;
        assert_eq!(status(&app), RowStatus::Saving);

        app.handle_data(DataEvent::FieldSaved {
            ticket,
            result: Ok(job("j1", "Cashiers", "ff0000")),
        });
        assert_eq!(status(&app), RowStatus::Saved);
    }

    #[test]
    fn test_unchanged_name_not_persisted() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(app.edit.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_escape_reverts_name() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.jobs.get(&JobId::new("j1")).unwrap().name, "Cashie");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.jobs.get(&JobId::new("j1")).unwrap().name, "Cashier");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_moving_selection_blurs_and_commits() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "!");
        press(&mut app, KeyCode::Down);

        assert!(matches!(rx.try_recv(), Ok(StoreRequest::Rename { .. })));
        assert!(app.edit.is_none());
        assert_eq!(app.list_state.selected, 1);
    }

    #[test]
    fn test_rename_error_attached_to_row() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('!'));
        press(&mut app, KeyCode::Enter);
        let StoreRequest::Rename { ticket, .. } = rx.try_recv().unwrap() else {
            panic!("expected rename");
        };

        app.handle_data(DataEvent::FieldSaved {
            ticket,
            result: Err("A job named 'Cashier!' already exists".to_string()),
        });
        let row = app.list_model().rows[0].model().cloned().unwrap();
        assert_eq!(row.status, RowStatus::Idle);
        assert_eq!(
            row.errors,
            [(JobField::Name, "A job named 'Cashier!' already exists".to_string())]
        );
    }

    #[test]
    fn test_color_picker_choose() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Char('c'));
        assert!(app.picker.is_open_for(&JobId::new("j1")));
        assert_eq!(app.input_mode(), InputMode::Picker);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.picker, PickerState::Closed);
        match rx.try_recv().unwrap() {
            StoreRequest::Recolor { ticket, color } => {
                assert_eq!(ticket.key.field, JobField::Color);
                assert_eq!(color, app.palette[1]);
            }
            other => panic!("unexpected request: {other:?}"),
        }
        assert_eq!(app.jobs.get(&JobId::new("j1")).unwrap().color, app.palette[1]);
    }

    #[test]
    fn test_only_one_picker_open() {
        let (mut app, _rx) = app();
        app.dispatch(ListIntent::ColorSwatchClicked { job: Some(JobId::new("j1")) });
        app.dispatch(ListIntent::ColorSwatchClicked { job: Some(JobId::new("j3")) });
        assert!(app.picker.is_open_for(&JobId::new("j3")));

        let open: Vec<bool> = app
            .list_model()
            .rows
            .iter()
            .filter_map(|r| r.model().map(|m| m.picker_open))
            .collect();
        assert_eq!(open, [false, true]);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.picker, PickerState::Closed);
    }

    #[test]
    fn test_archive_with_confirmation() {
        let (mut app, mut rx) = app();
        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.modal, ModalState::ConfirmArchive { .. }));
        assert!(rx.try_recv().is_err());

        press(&mut app, KeyCode::Char('y'));
        assert!(matches!(rx.try_recv(), Ok(StoreRequest::Archive { job }) if job == JobId::new("j1")));
        assert_eq!(row_names(&app), ["Cook", "+"]);
    }

    #[test]
    fn test_failed_archive_restores_row() {
        let (mut app, _rx) = app();
        app.confirm_archive = false;
        app.dispatch(ListIntent::DeleteClicked { job: JobId::new("j3") });
        assert_eq!(row_names(&app), ["Cashier", "+"]);

        app.handle_data(DataEvent::JobArchived {
            job: JobId::new("j3"),
            result: Err("disk full".to_string()),
        });
        assert_eq!(row_names(&app), ["Cashier", "Cook", "+"]);
        let toast = app.feedback.current_toast().unwrap();
        assert!(!toast.success);
        assert_eq!(toast.message, "disk full");
    }

    #[test]
    fn test_live_search() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "cash");
        assert_eq!(row_names(&app), ["Cashier", "+"]);

        press(&mut app, KeyCode::Enter);
        assert!(!app.modal.is_searching());
        assert_eq!(app.query, "cash");

        press(&mut app, KeyCode::Esc);
        assert!(app.query.is_empty());

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "xyz");
        assert_eq!(row_names(&app), ["+"]);
    }

    #[test]
    fn test_stale_results_ignored() {
        let (mut app, _rx) = app();
        let ticket = SaveTicket {
            key: SaveKey::new(JobId::new("gone"), JobField::Name),
            seq: 99,
        };
        let result = app.handle_data(DataEvent::FieldSaved {
            ticket,
            result: Ok(job("gone", "Ghost", "ffffff")),
        });
        assert_eq!(result, EventResult::Unchanged);
        assert!(!app.jobs.contains(&JobId::new("gone")));

        let result = app.handle_data(DataEvent::JobCreated {
            draft_seq: 42,
            result: Err("nope".to_string()),
        });
        assert_eq!(result, EventResult::Unchanged);
    }

    #[test]
    fn test_add_row_activation_via_selection() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.list_state.selected, 2);
        press(&mut app, KeyCode::Enter);
        assert!(app.draft.is_visible());
    }

    #[test]
    fn test_quit_from_editing_with_ctrl_c() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Enter);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_input(InputEvent::Key(ctrl_c)), EventResult::Quit);
        assert!(!app.running);
    }
}
