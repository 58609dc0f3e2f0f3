//! FavoritesPane component — the Favorites page.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use concert_core::format::{format_date, format_time, tbd_or};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{
    style_muted, style_selected_bold, C_ERROR, C_FAVORITE, C_LOCATION, C_MUTED, C_PRIMARY,
    C_SECONDARY,
};

pub struct FavoritesPane {
    cursor: usize,
    list_state: ListState,
}

impl FavoritesPane {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            list_state: ListState::default(),
        }
    }
}

impl Component for FavoritesPane {
    fn id(&self) -> ComponentId {
        ComponentId::FavoritesPane
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        let len = state.selections.favorites.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    self.cursor = (self.cursor + 1).min(len - 1);
                }
            }
            KeyCode::Char('x') | KeyCode::Char('f') | KeyCode::Enter => {
                if let Some(rec) = state.selections.favorites.iter().nth(self.cursor) {
                    return vec![Action::ToggleFavorite(rec.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn sync(&mut self, state: &AppState) {
        let len = state.selections.favorites.len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let favorites = &state.selections.favorites;
        if favorites.is_empty() {
            frame.render_widget(
                Paragraph::new("No favorited concerts.").style(style_muted()),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = favorites
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                let name_style = if i == self.cursor {
                    style_selected_bold()
                } else {
                    Style::default().fg(C_PRIMARY)
                };
                let mut title = vec![
                    Span::styled("★ ", Style::default().fg(C_FAVORITE)),
                    Span::styled(rec.name.clone(), name_style),
                ];
                if !state.is_listed(rec.id) {
                    title.push(Span::styled(
                        "  (no longer listed)",
                        Style::default().fg(C_ERROR),
                    ));
                }
                let detail = Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format_date(Some(rec.date)), Style::default().fg(C_SECONDARY)),
                    Span::styled(" · ", Style::default().fg(C_MUTED)),
                    Span::styled(format_time(rec.time), Style::default().fg(C_SECONDARY)),
                    Span::styled(" · ", Style::default().fg(C_MUTED)),
                    Span::styled(
                        tbd_or(rec.location.as_deref()).to_string(),
                        Style::default().fg(C_LOCATION),
                    ),
                ]);
                ListItem::new(vec![Line::from(title), detail, Line::from("")])
            })
            .collect();

        self.list_state.select(Some(self.cursor));
        frame.render_stateful_widget(List::new(items), area, &mut self.list_state);
    }
}
