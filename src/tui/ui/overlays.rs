//! Overlay and popup rendering
//!
//! Handles rendering of help, search bar, color picker popover, confirm dialog, and toast notifications.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Toast};
use crate::tui::i18n::MessageKey;
use crate::tui::theme::Theme;

use super::widgets::centered_rect;

pub fn render_help_overlay(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(60, 70, area);

    // Clear the area first
    frame.render_widget(Clear, popup_area);

    let mut help_text = Vec::new();
    for (title, keys) in [
        (MessageKey::HelpNavigation, MessageKey::HelpNavigationKeys),
        (MessageKey::HelpJobs, MessageKey::HelpJobsKeys),
        (MessageKey::HelpEditing, MessageKey::HelpEditingKeys),
    ] {
        help_text.push(Line::from(Span::styled(
            app.catalog.t(title),
            Style::default().fg(theme.accent).bold(),
        )));
        help_text.extend(app.catalog.t(keys).lines().map(|line| Line::from(format!("  {line}"))));
        help_text.push(Line::from(""));
    }
    help_text.push(Line::from(format!("  {}", app.catalog.t(MessageKey::HelpFooter))));

    let help_para = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .title(format!(" {} ", app.catalog.t(MessageKey::HelpTitle))),
        )
        .style(Style::default().fg(theme.fg));

    frame.render_widget(help_para, popup_area);
}

pub fn render_search_bar(app: &App, cursor: usize, frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4).min(60),
        height: 3,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" {} ", app.catalog.t(MessageKey::SearchTitle)));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let input = format!("/{}", app.query);
    frame.render_widget(Paragraph::new(input).style(Style::default().fg(theme.fg)), inner);

    let before: String = app.query.chars().take(cursor).collect();
    let x = inner.x + 1 + Span::raw(before).width() as u16;
    frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
}

/// Render the swatch popover below the row at `anchor`
pub fn render_color_picker(app: &App, frame: &mut Frame, anchor: Rect, area: Rect, theme: &Theme) {
    let Some(cursor) = app.picker.cursor() else {
        return;
    };

    let width = (app.palette.len() as u16 * 3 + 3).max(16).min(area.width);
    let height = 4;
    let below = anchor.y.saturating_add(1);
    let y = if below + height <= area.bottom() {
        below
    } else {
        anchor.y.saturating_sub(height)
    };
    let popup_area = Rect {
        x: (anchor.x + 2).min(area.right().saturating_sub(width)),
        y,
        width,
        height,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(format!(" {} ", app.catalog.t(MessageKey::PickerTitle)));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let swatches: Vec<Span> = app
        .palette
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let style = Style::default().fg(theme.swatch_color(color));
            if i == cursor {
                Span::styled("[■]", style.bold())
            } else {
                Span::styled(" ■ ", style)
            }
        })
        .collect();

    let highlighted = app
        .picker
        .highlighted(&app.palette)
        .map(|color| format!(" #{color}"))
        .unwrap_or_default();

    let lines = vec![
        Line::from(swatches),
        Line::from(Span::styled(highlighted, Style::default().fg(theme.muted))),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the archive confirmation dialog
pub fn render_confirm_dialog(app: &App, name: &str, frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.saving))
        .title(format!(" {} ", app.catalog.t(MessageKey::ConfirmTitle)));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                app.catalog.t_with(MessageKey::ArchivePrompt, name),
                Style::default().bold(),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(app.catalog.t(MessageKey::ConfirmHint), Style::default().fg(theme.border)),
        ]),
    ];

    let para = Paragraph::new(lines)
        .style(Style::default().fg(theme.fg))
        .alignment(Alignment::Left);
    frame.render_widget(para, inner);
}

/// Render toast notification
pub fn render_toast(toast: &Toast, frame: &mut Frame, area: Rect, theme: &Theme) {
    // Position toast at bottom-right
    let toast_width = (toast.message.chars().count() + 4).min(40) as u16;
    let toast_area = Rect {
        x: area.width.saturating_sub(toast_width + 2),
        y: area.height.saturating_sub(4),
        width: toast_width.min(area.width),
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, toast_area);

    let border_color = if toast.success {
        theme.success
    } else {
        theme.error
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let para = Paragraph::new(format!(" {} ", toast.message))
        .block(block)
        .style(Style::default().fg(theme.fg))
        .alignment(Alignment::Center);

    frame.render_widget(para, toast_area);
}
