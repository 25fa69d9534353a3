//! Job list rendering
//!
//! Draws the rows produced by `build_job_list`: one editable row per job,
//! the new-job draft, and the trailing "add new job" row.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::formatting::truncate_string;
use crate::tui::app::{App, JobField, RowModel, RowStatus, ViewRow};
use crate::tui::i18n::MessageKey;
use crate::tui::theme::Theme;

use super::spinner;
use super::widgets::create_table_header;

/// Render the job list. Returns the screen line of the row whose color
/// picker is open, so the popover can be drawn next to it.
pub fn render_job_list(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) -> Option<Rect> {
    let model = app.list_model();

    let title = if !app.loaded || model.job_count() > 0 || app.draft.is_visible() {
        format!(" {} ", app.catalog.t(MessageKey::JobsTitle))
    } else if model.filtered {
        format!(" {} ", app.catalog.t(MessageKey::NoMatches))
    } else {
        format!(" {} ", app.catalog.t(MessageKey::NoJobs))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.loaded && app.jobs.is_empty() {
        let para = Paragraph::new(app.catalog.t(MessageKey::Loading))
            .style(Style::default().fg(theme.border))
            .alignment(Alignment::Center);
        frame.render_widget(para, inner);
        return None;
    }

    let header = create_table_header(
        &[
            app.catalog.t(MessageKey::ColumnName),
            app.catalog.t(MessageKey::ColumnColor),
            "",
        ],
        theme,
    );

    let available_height = inner.height.saturating_sub(1) as usize; // -1 for header
    let selected = app.list_state.selected;
    let scroll_offset = app.list_state.scroll_offset;

    let mut picker_anchor = None;
    let mut cursor_position = None;

    let rows: Vec<Row> = model
        .rows
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(available_height)
        .map(|(index, row)| {
            let is_selected = index == selected;
            let line_y = inner.y + 1 + (index - scroll_offset) as u16;
            let table_row = match row {
                ViewRow::Job(m) | ViewRow::Draft(m) => {
                    if m.picker_open {
                        picker_anchor = Some(Rect::new(inner.x, line_y, inner.width, 1));
                    }
                    if let Some(edit) = app.edit.as_ref().filter(|e| e.target == m.target) {
                        let before: String = m.name.chars().take(edit.cursor).collect();
                        let x = inner.x + Span::raw(before).width() as u16;
                        cursor_position = Some((x.min(inner.right().saturating_sub(1)), line_y));
                    }
                    job_row(app, m, theme)
                }
                ViewRow::AddNewJob => Row::new(vec![
                    Cell::from(app.catalog.t(MessageKey::AddNewJobs))
                        .style(Style::default().fg(theme.accent)),
                    Cell::from(""),
                    Cell::from(""),
                ]),
            };
            if is_selected {
                table_row.style(Style::default().bg(theme.selected_bg).fg(theme.selected_fg))
            } else {
                table_row
            }
        })
        .collect();

    let widths = [
        Constraint::Min(20),    // Name
        Constraint::Length(10), // Color
        Constraint::Fill(1),    // Status and errors
    ];

    let table = Table::new(rows, widths).header(header);
    frame.render_widget(table, inner);

    if let Some(position) = cursor_position {
        frame.set_cursor_position(position);
    }

    picker_anchor
}

fn job_row<'a>(app: &'a App, row: &'a RowModel, theme: &Theme) -> Row<'a> {
    let editing = app.is_editing(&row.target);

    let name_cell = if editing {
        Cell::from(row.name.as_str()).style(Style::default().bg(theme.editing_bg).fg(theme.fg))
    } else if row.name.is_empty() && row.is_new {
        Cell::from(app.catalog.t(MessageKey::NamePlaceholder))
            .style(Style::default().fg(theme.muted).italic())
    } else {
        Cell::from(truncate_string(&row.name, app.name_max_length))
    };

    let mut swatch = vec![
        Span::styled("■■", Style::default().fg(theme.swatch_color(&row.color))),
        Span::styled(format!(" {}", row.color), Style::default().fg(theme.muted)),
    ];
    if row.picker_open {
        swatch.push(Span::styled("▾", Style::default().fg(theme.accent)));
    }

    let mut status = Vec::new();
    match row.status {
        RowStatus::Saving => status.push(Span::styled(
            format!("{} {}", spinner(app.spinner_frame), app.catalog.t(MessageKey::Saving)),
            Style::default().fg(theme.status_color(row.status)),
        )),
        RowStatus::Saved => status.push(Span::styled(
            format!("✓ {}", app.catalog.t(MessageKey::JobSaved)),
            Style::default().fg(theme.status_color(row.status)),
        )),
        RowStatus::Idle => {}
    }
    if !row.errors.is_empty() {
        if !status.is_empty() {
            status.push(Span::raw(" "));
        }
        let errors: Vec<String> = row
            .errors
            .iter()
            .map(|(field, message)| match field {
                JobField::Name => message.clone(),
                JobField::Color => app.catalog.t_fill(MessageKey::ColorError, &[("message", message)]),
            })
            .collect();
        status.push(Span::styled(
            format!("⚠ {}", errors.join("; ")),
            Style::default().fg(theme.error),
        ));
    }

    Row::new(vec![
        name_cell,
        Cell::from(Line::from(swatch)),
        Cell::from(Line::from(status)),
    ])
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::sync::mpsc;

    use super::*;
    use crate::models::{AppConfig, HexColor, Job, JobId};
    use crate::tui::app::SaveKey;
    use crate::tui::event::DataEvent;
    use crate::tui::i18n::Translate;

    fn draw_buffer(app: &App) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(70, 10)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_job_list(app, frame, area, &app.theme);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn draw(app: &App) -> String {
        let buffer = draw_buffer(app);
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with_job() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&AppConfig::default(), Vec::new(), tx);
        app.handle_data(DataEvent::JobsLoaded(vec![Job::new(
            JobId::new("j1"),
            "Cashier",
            HexColor::parse("ff0000").unwrap(),
        )]));
        app
    }

    #[test]
    fn test_saving_and_error_states_rendered() {
        let mut app = app_with_job();
        let ticket = app.save.begin(SaveKey::new(JobId::new("j1"), JobField::Name));
        assert!(draw(&app).contains("Saving"));

        app.handle_data(DataEvent::FieldSaved {
            ticket,
            result: Err("Job name cannot be empty".to_string()),
        });
        let text = draw(&app);
        assert!(!text.contains("Saving"));
        assert!(text.contains("Job name cannot be empty"));
    }

    struct German;

    impl Translate for German {
        fn t(&self, key: MessageKey) -> &str {
            match key {
                MessageKey::JobsTitle => "Aufgaben",
                MessageKey::AddNewJobs => "+ Neue Aufgabe",
                MessageKey::ColumnName => "Bezeichnung",
                MessageKey::ColorError => "Farbe: {message}",
                other => other.name(),
            }
        }
    }

    #[test]
    fn test_injected_catalog_and_theme() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&AppConfig::default(), Vec::new(), tx)
            .with_catalog(Box::new(German))
            .with_theme(Theme::light());
        app.handle_data(DataEvent::JobsLoaded(vec![Job::new(
            JobId::new("j1"),
            "Cashier",
            HexColor::parse("ff0000").unwrap(),
        )]));
        let ticket = app.save.begin(SaveKey::new(JobId::new("j1"), JobField::Color));
        app.handle_data(DataEvent::FieldSaved {
            ticket,
            result: Err("offline".to_string()),
        });

        let buffer = draw_buffer(&app);
        assert_eq!(buffer[(0, 0)].fg, Theme::light().border_focused);

        let text = draw(&app);
        assert!(text.contains("Aufgaben"));
        assert!(text.contains("Bezeichnung"));
        assert!(text.contains("+ Neue Aufgabe"));
        assert!(text.contains("Farbe: offline"));
        assert!(!text.contains("Jobs"));
    }

    #[test]
    fn test_empty_list_title() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&AppConfig::default(), Vec::new(), tx);
        assert!(draw(&app).contains("Loading jobs"));

        app.handle_data(DataEvent::JobsLoaded(Vec::new()));
        let text = draw(&app);
        assert!(text.contains("No jobs yet"));
        assert!(text.contains("+ Add new job"));
    }
}
