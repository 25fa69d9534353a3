//! UI rendering for the TUI
//!
//! This module handles all rendering using ratatui. The rendering is event-driven -
//! we only render when an event triggers a state change, not at a fixed frame rate.

mod jobs;
mod overlays;
mod widgets;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ModalState, RowStatus};
use crate::tui::event::InputMode;
use crate::tui::i18n::MessageKey;
use crate::tui::theme::Theme;

use jobs::render_job_list;
use overlays::{
    render_color_picker, render_confirm_dialog, render_help_overlay, render_search_bar,
    render_toast,
};

/// Screen row of the first table body line: title bar, info bar, top border, header
pub const TABLE_BODY_TOP: u16 = 4;

/// Rows that are not part of the table body
pub const VIEWPORT_CHROME_ROWS: u16 = TABLE_BODY_TOP + 1 + 2;

pub(crate) const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the entire TUI
pub fn render(app: &App, frame: &mut Frame) {
    let theme = &app.theme;
    let area = frame.area();

    // Main layout: header, content, footer
    let layout = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Info bar
        Constraint::Min(0),    // Job list
        Constraint::Length(2), // Status bar
    ])
    .split(area);

    render_title_bar(app, frame, layout[0], theme);
    render_info_bar(app, frame, layout[1], theme);
    let picker_anchor = render_job_list(app, frame, layout[2], theme);
    render_status_bar(app, frame, layout[3], theme);

    if let Some(anchor) = picker_anchor {
        render_color_picker(app, frame, anchor, area, theme);
    }

    // Overlays (render in order of z-index)
    match &app.modal {
        ModalState::Help => render_help_overlay(app, frame, area, theme),
        ModalState::Search { cursor } => render_search_bar(app, *cursor, frame, area, theme),
        ModalState::ConfirmArchive { name, .. } => {
            render_confirm_dialog(app, name, frame, area, theme)
        }
        ModalState::None => {}
    }

    // Toast (always on top)
    if let Some(toast) = app.feedback.current_toast() {
        render_toast(toast, frame, area, theme);
    }
}

pub(crate) fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

fn render_title_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {}", app.catalog.t(MessageKey::JobsTitle)),
            Style::default().fg(theme.accent).bold(),
        ),
        Span::styled(" | ", Style::default().fg(theme.border)),
        Span::styled(app.team_name.as_str(), Style::default().fg(theme.fg)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_info_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let model = app.list_model();
    let active = app.jobs.active_count();

    let total = active.to_string();
    let count = if model.filtered {
        let shown = model.job_count().to_string();
        app.catalog.t_fill(MessageKey::JobCountFiltered, &[("shown", &shown), ("total", &total)])
    } else {
        app.catalog.t_fill(MessageKey::JobCount, &[("count", &total)])
    };

    let filter_info = if app.query.is_empty() {
        String::new()
    } else {
        format!(" | {}", app.catalog.t_fill(MessageKey::SearchInfo, &[("query", &app.query)]))
    };

    let saving = model
        .rows
        .iter()
        .filter_map(|row| row.model())
        .filter(|row| row.status == RowStatus::Saving)
        .count();
    let saving_info = if saving > 0 {
        format!(
            " | {} {} ({})",
            spinner(app.spinner_frame),
            app.catalog.t(MessageKey::Saving),
            saving
        )
    } else {
        String::new()
    };

    let info = format!(" {count}{filter_info}{saving_info}");
    let para = Paragraph::new(info).style(Style::default().fg(theme.border));
    frame.render_widget(para, area);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let layout = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

    // Keybindings line - context-sensitive
    let keybinds = match app.input_mode() {
        InputMode::Normal => {
            " j/k:move  Enter:edit  n:new  c:color  d:archive  /:search  r:reload  ?:help  q:quit "
        }
        InputMode::Editing => " Enter/Tab:save  Esc:revert  Ctrl+u:clear  Up/Down:save+move ",
        InputMode::Search => " type to filter  Enter:keep  Esc:clear ",
        InputMode::Picker => " h/l:choose  Enter:apply  Esc:close ",
        InputMode::Confirm => " y:archive  n:cancel ",
    };
    let keybinds_para = Paragraph::new(keybinds).style(Style::default().fg(theme.border));
    frame.render_widget(keybinds_para, layout[0]);

    let mut status_parts = Vec::new();

    // Show current mode if not normal
    let mode_name = match app.input_mode() {
        InputMode::Editing => "EDIT",
        InputMode::Search => "SEARCH",
        InputMode::Picker => "COLOR",
        InputMode::Confirm => "CONFIRM",
        InputMode::Normal => "",
    };
    if !mode_name.is_empty() {
        status_parts.push(Span::styled(
            format!(" [{}]", mode_name),
            Style::default().fg(theme.accent).bold(),
        ));
    }

    if !app.loaded {
        status_parts.push(Span::styled(
            format!(" {} {}", spinner(app.spinner_frame), app.catalog.t(MessageKey::Loading)),
            Style::default().fg(theme.saving),
        ));
    }

    // Config warnings display (persistent until fixed)
    if !app.feedback.config_warnings.is_empty() {
        // Show first warning with count if multiple
        let warning_text = if app.feedback.config_warnings.len() == 1 {
            format!(" | WARN: {}", app.feedback.config_warnings[0])
        } else {
            format!(
                " | WARN: {} (+{} more)",
                app.feedback.config_warnings[0],
                app.feedback.config_warnings.len() - 1
            )
        };
        status_parts.push(Span::styled(warning_text, Style::default().fg(theme.saving)));
    }

    // Error display (temporary, auto-dismisses)
    if let Some(error) = app.current_error() {
        status_parts.push(Span::styled(
            format!(" | ERROR: {} ", error),
            Style::default().fg(theme.error),
        ));
    }

    let status_para = Paragraph::new(Line::from(status_parts));
    frame.render_widget(status_para, layout[1]);
}
