//! AdminPanel component — the concert management page: a table of every
//! record plus an add/edit form overlay.
//!
//! Validation runs here, before anything is dispatched; a form that fails
//! never produces a `SubmitConcert` action.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use concert_core::record::{ConcertRecord, ConcertStatus};
use concert_core::validate::{validate, ConcertForm};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::component::Component;
use crate::components::pad_width;
use crate::theme::{
    style_border, style_error, style_muted, style_secondary, style_selected, C_ACCENT,
    C_FIELD_LABEL, C_PAST, C_PRIMARY, C_UPCOMING,
};

const FIELD_COUNT: usize = 7;
const FIELD_LABELS: [&str; FIELD_COUNT] = [
    "Name", "Date", "Time", "Location", "Genre", "Price", "Details",
];
/// Index of the status selector row, one past the text fields.
const STATUS_ROW: usize = FIELD_COUNT;

struct FormOverlay {
    editing_id: Option<i64>,
    inputs: [Input; FIELD_COUNT],
    status: ConcertStatus,
    focus: usize,
    issues: Vec<String>,
}

impl FormOverlay {
    fn blank() -> Self {
        Self {
            editing_id: None,
            inputs: std::array::from_fn(|_| Input::default()),
            status: ConcertStatus::Upcoming,
            focus: 0,
            issues: Vec::new(),
        }
    }

    fn for_record(record: &ConcertRecord) -> Self {
        let form = ConcertForm::from_record(record);
        Self {
            editing_id: form.id,
            inputs: [
                Input::new(form.name),
                Input::new(form.date),
                Input::new(form.time),
                Input::new(form.location),
                Input::new(form.genre),
                Input::new(form.price),
                Input::new(form.details),
            ],
            status: form.status,
            focus: 0,
            issues: Vec::new(),
        }
    }

    fn to_form(&self) -> ConcertForm {
        ConcertForm {
            id: self.editing_id,
            name: self.inputs[0].value().to_string(),
            date: self.inputs[1].value().to_string(),
            time: self.inputs[2].value().to_string(),
            location: self.inputs[3].value().to_string(),
            genre: self.inputs[4].value().to_string(),
            price: self.inputs[5].value().to_string(),
            details: self.inputs[6].value().to_string(),
            status: self.status,
        }
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (FIELD_COUNT + 1);
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + FIELD_COUNT) % (FIELD_COUNT + 1);
    }

    fn toggle_status(&mut self) {
        self.status = match self.status {
            ConcertStatus::Upcoming => ConcertStatus::Past,
            ConcertStatus::Past => ConcertStatus::Upcoming,
        };
    }

    /// Returns the submit action once the form passes local validation.
    /// Esc is handled by the caller (it closes the overlay).
    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => {
                let form = self.to_form();
                match validate(&form) {
                    Ok(()) => return Some(Action::SubmitConcert(form)),
                    Err(e) => self.issues = e.issues,
                }
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.focus == STATUS_ROW => {
                self.toggle_status();
            }
            _ => {
                if self.focus < FIELD_COUNT {
                    self.inputs[self.focus]
                        .handle_event(&ratatui::crossterm::event::Event::Key(key));
                }
            }
        }
        None
    }
}

pub struct AdminPanel {
    cursor: usize,
    list_state: ListState,
    form: Option<FormOverlay>,
    /// Armed delete target: pressing d twice on the same row confirms.
    pending_delete: Option<i64>,
}

impl AdminPanel {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            list_state: ListState::default(),
            form: None,
            pending_delete: None,
        }
    }

    pub fn form_open(&self) -> bool {
        self.form.is_some()
    }

    /// Called by the App when a background save finishes.
    pub fn on_save_result(&mut self, result: &Result<Option<i64>, String>) {
        match result {
            Ok(_) => self.form = None,
            Err(message) => {
                if let Some(form) = &mut self.form {
                    form.issues = vec![message.clone()];
                }
            }
        }
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let records = state.all_records();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let header = format!(
            "{} {} {}  {} {} {} {}",
            pad_width("NAME", 24),
            pad_width("DATE", 10),
            pad_width("TIME", 5),
            pad_width("LOCATION", 18),
            pad_width("GENRE", 10),
            pad_width("PRICE", 8),
            "STATUS",
        );
        frame.render_widget(
            Paragraph::new(header).style(Style::default().fg(C_FIELD_LABEL)),
            chunks[0],
        );

        if records.is_empty() {
            frame.render_widget(
                Paragraph::new(if state.loading {
                    "Loading concerts…"
                } else {
                    "No concert records. Press a to add one."
                })
                .style(style_muted()),
                chunks[1],
            );
        } else {
            let items: Vec<ListItem> = records
                .iter()
                .enumerate()
                .map(|(i, rec)| {
                    let time = rec
                        .time
                        .map(|t| t.format("%H:%M").to_string())
                        .unwrap_or_else(|| "--:--".to_string());
                    let row = format!(
                        "{} {} {}  {} {} {} ",
                        pad_width(&rec.name, 24),
                        rec.date.format("%Y-%m-%d"),
                        pad_width(&time, 5),
                        pad_width(rec.location.as_deref().unwrap_or(""), 18),
                        pad_width(rec.genre.as_deref().unwrap_or(""), 10),
                        pad_width(rec.price.as_deref().unwrap_or(""), 8),
                    );
                    let status_style = match rec.status {
                        ConcertStatus::Upcoming => Style::default().fg(C_UPCOMING),
                        ConcertStatus::Past => Style::default().fg(C_PAST),
                    };
                    let row_style = if i == self.cursor {
                        style_selected()
                    } else {
                        Style::default().fg(C_PRIMARY)
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(row, row_style),
                        Span::styled(rec.status.as_str(), status_style),
                    ]))
                })
                .collect();
            self.list_state.select(Some(self.cursor));
            frame.render_stateful_widget(List::new(items), chunks[1], &mut self.list_state);
        }

        let footer = match self.pending_delete {
            Some(id) => {
                let name = state
                    .board
                    .find(id)
                    .map(|r| r.name.as_str())
                    .unwrap_or("record");
                Line::from(Span::styled(
                    format!("press d again to delete \"{name}\""),
                    style_error(),
                ))
            }
            None => Line::from(Span::styled(
                "a add · e edit · d delete · ↑↓ navigate",
                style_secondary(),
            )),
        };
        frame.render_widget(Paragraph::new(footer), chunks[2]);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let Some(form) = &self.form else { return };

        let issue_rows = form.issues.len().min(3) as u16;
        let height = (FIELD_COUNT as u16 + 1) + issue_rows + 4;
        let width = area.width.saturating_sub(8).min(64).max(40);
        let popup = centered_rect(width, height, area);

        frame.render_widget(Clear, popup);
        let title = if form.editing_id.is_some() {
            " Edit Concert "
        } else {
            " Add Concert "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_border())
            .title(Span::styled(title, Style::default().fg(C_ACCENT)));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut y = inner.y;
        for (i, input) in form.inputs.iter().enumerate() {
            if y >= inner.bottom() {
                return;
            }
            let focused = form.focus == i;
            let label_style = if focused {
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_FIELD_LABEL)
            };
            let line = Line::from(vec![
                Span::styled(pad_width(FIELD_LABELS[i], 10), label_style),
                Span::styled(input.value().to_string(), Style::default().fg(C_PRIMARY)),
            ]);
            frame.render_widget(
                Paragraph::new(line),
                Rect::new(inner.x, y, inner.width, 1),
            );
            if focused {
                let cursor_x = inner.x + 10 + input.visual_cursor() as u16;
                frame.set_cursor_position((cursor_x.min(inner.x + inner.width - 1), y));
            }
            y += 1;
        }

        if y >= inner.bottom() {
            return;
        }
        let status_focused = form.focus == STATUS_ROW;
        let status_label_style = if status_focused {
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_FIELD_LABEL)
        };
        let status_value_style = match form.status {
            ConcertStatus::Upcoming => Style::default().fg(C_UPCOMING),
            ConcertStatus::Past => Style::default().fg(C_PAST),
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(pad_width("Status", 10), status_label_style),
                Span::styled(format!("◂ {} ▸", form.status.as_str()), status_value_style),
            ])),
            Rect::new(inner.x, y, inner.width, 1),
        );
        y += 2;

        for issue in form.issues.iter().take(3) {
            if y >= inner.bottom() {
                return;
            }
            frame.render_widget(
                Paragraph::new(issue.as_str()).style(style_error()),
                Rect::new(inner.x, y, inner.width, 1),
            );
            y += 1;
        }

        if y < inner.bottom() {
            frame.render_widget(
                Paragraph::new("Enter save · Esc cancel · Tab next field").style(style_muted()),
                Rect::new(inner.x, y, inner.width, 1),
            );
        }
    }
}

impl Component for AdminPanel {
    fn id(&self) -> ComponentId {
        ComponentId::AdminPanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if !state.is_admin() {
            return vec![];
        }

        if let Some(form) = &mut self.form {
            if key.code == KeyCode::Esc {
                self.form = None;
                return vec![];
            }
            return form.handle_key(key).into_iter().collect();
        }

        // Any key other than d disarms a pending delete.
        if key.code != KeyCode::Char('d') {
            self.pending_delete = None;
        }

        let records = state.all_records();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if !records.is_empty() {
                    self.cursor = (self.cursor + 1).min(records.len() - 1);
                }
            }
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => self.cursor = records.len().saturating_sub(1),
            KeyCode::Char('a') => self.form = Some(FormOverlay::blank()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(rec) = records.get(self.cursor) {
                    self.form = Some(FormOverlay::for_record(rec));
                }
            }
            KeyCode::Char('d') => {
                if let Some(rec) = records.get(self.cursor) {
                    if self.pending_delete == Some(rec.id) {
                        self.pending_delete = None;
                        return vec![Action::DeleteConcert(rec.id)];
                    }
                    self.pending_delete = Some(rec.id);
                }
            }
            _ => {}
        }
        vec![]
    }

    fn sync(&mut self, state: &AppState) {
        let len = state.all_records().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        if let Some(id) = self.pending_delete {
            if state.board.find(id).is_none() {
                self.pending_delete = None;
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if !state.is_admin() {
            frame.render_widget(
                Paragraph::new("Log in with an admin account to manage concerts.")
                    .style(style_muted()),
                area,
            );
            return;
        }

        self.draw_table(frame, area, state);
        if self.form.is_some() {
            self.draw_form(frame, area);
        }
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
