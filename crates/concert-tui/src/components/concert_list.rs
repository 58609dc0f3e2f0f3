//! ConcertList component — the Concerts page: upcoming/past tabs.

use std::collections::HashSet;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Tabs},
    Frame,
};

use concert_core::format::{format_date, format_time, tbd_or};
use concert_core::record::ConcertRecord;

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::component::Component;
use crate::components::truncate_width;
use crate::theme::{
    style_muted, style_secondary, style_selected_bold, C_ACCENT, C_CART, C_FAVORITE, C_GENRE,
    C_LOCATION, C_MUTED, C_PRICE, C_PRIMARY, C_SECONDARY, C_UPCOMING,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcertTab {
    #[default]
    Upcoming,
    Past,
}

pub struct ConcertList {
    pub tab: ConcertTab,
    cursor: usize,
    list_state: ListState,
    /// Past rows whose details text is unfolded.
    expanded: HashSet<i64>,
}

impl ConcertList {
    pub fn new() -> Self {
        Self {
            tab: ConcertTab::Upcoming,
            cursor: 0,
            list_state: ListState::default(),
            expanded: HashSet::new(),
        }
    }

    fn rows<'a>(&self, state: &'a AppState) -> &'a [ConcertRecord] {
        match self.tab {
            ConcertTab::Upcoming => &state.board.upcoming,
            ConcertTab::Past => &state.board.past,
        }
    }

    fn selected<'a>(&self, state: &'a AppState) -> Option<&'a ConcertRecord> {
        self.rows(state).get(self.cursor)
    }

    fn switch_tab(&mut self) {
        self.tab = match self.tab {
            ConcertTab::Upcoming => ConcertTab::Past,
            ConcertTab::Past => ConcertTab::Upcoming,
        };
        self.cursor = 0;
    }

    fn render_item(&self, record: &ConcertRecord, selected: bool, state: &AppState, width: u16) -> ListItem<'static> {
        let name_style = if selected {
            style_selected_bold()
        } else {
            Style::default().fg(C_PRIMARY)
        };

        let mut title: Vec<Span> = vec![Span::styled(record.name.clone(), name_style)];
        if let Some(genre) = &record.genre {
            title.push(Span::styled("  ", Style::default()));
            title.push(Span::styled(
                genre.to_uppercase(),
                Style::default().fg(C_GENRE),
            ));
        }
        if record.status == concert_core::record::ConcertStatus::Upcoming {
            if state.selections.cart.has(record.id) {
                title.push(Span::styled("  in cart", Style::default().fg(C_CART)));
            }
            if state.selections.favorites.has(record.id) {
                title.push(Span::styled("  ★", Style::default().fg(C_FAVORITE)));
            }
        }

        let detail_line = Line::from(vec![
            Span::raw("  "),
            Span::styled(format_date(Some(record.date)), Style::default().fg(C_SECONDARY)),
            Span::styled(" · ", Style::default().fg(C_MUTED)),
            Span::styled(format_time(record.time), Style::default().fg(C_SECONDARY)),
            Span::styled(" · ", Style::default().fg(C_MUTED)),
            Span::styled(
                tbd_or(record.location.as_deref()).to_string(),
                Style::default().fg(C_LOCATION),
            ),
            Span::styled(" · ", Style::default().fg(C_MUTED)),
            Span::styled(
                tbd_or(record.price.as_deref()).to_string(),
                Style::default().fg(C_PRICE),
            ),
        ]);

        let mut lines = vec![Line::from(title), detail_line];
        if self.tab == ConcertTab::Past && self.expanded.contains(&record.id) {
            let details = record
                .details
                .clone()
                .unwrap_or_else(|| "No details recorded.".to_string());
            lines.push(Line::from(Span::styled(
                format!("  {}", truncate_width(&details, width.saturating_sub(4) as usize)),
                style_secondary(),
            )));
        }
        lines.push(Line::from(""));

        ListItem::new(lines)
    }
}

impl Component for ConcertList {
    fn id(&self) -> ComponentId {
        ComponentId::ConcertList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        let len = self.rows(state).len();
        match key.code {
            KeyCode::Tab | KeyCode::Left | KeyCode::Right | KeyCode::Char('t') => {
                self.switch_tab();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    self.cursor = (self.cursor + 1).min(len - 1);
                }
            }
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => self.cursor = len.saturating_sub(1),

            // Cart/favorite toggles apply to upcoming concerts; past rows
            // expose their details instead.
            KeyCode::Char('c') if self.tab == ConcertTab::Upcoming => {
                if let Some(rec) = self.selected(state) {
                    return vec![Action::ToggleCart(rec.clone())];
                }
            }
            KeyCode::Char('f') if self.tab == ConcertTab::Upcoming => {
                if let Some(rec) = self.selected(state) {
                    return vec![Action::ToggleFavorite(rec.clone())];
                }
            }
            KeyCode::Enter if self.tab == ConcertTab::Past => {
                if let Some(rec) = self.selected(state) {
                    let id = rec.id;
                    if !self.expanded.remove(&id) {
                        self.expanded.insert(id);
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn sync(&mut self, state: &AppState) {
        let len = self.rows(state).len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        // Expansion state is keyed by id, so it survives reordering; ids that
        // left the listing are dropped.
        self.expanded.retain(|id| state.board.find(*id).is_some());
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let tab_titles = vec![
            format!("Upcoming ({})", state.board.upcoming.len()),
            format!("Past ({})", state.board.past.len()),
        ];
        let tabs = Tabs::new(tab_titles)
            .select(match self.tab {
                ConcertTab::Upcoming => 0,
                ConcertTab::Past => 1,
            })
            .style(style_secondary())
            .highlight_style(
                Style::default()
                    .fg(match self.tab {
                        ConcertTab::Upcoming => C_UPCOMING,
                        ConcertTab::Past => C_ACCENT,
                    })
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        let rows = self.rows(state);
        if rows.is_empty() {
            let message = if state.loading {
                "Loading concerts…"
            } else {
                match self.tab {
                    ConcertTab::Upcoming => "No upcoming concerts.",
                    ConcertTab::Past => "No past concerts.",
                }
            };
            frame.render_widget(
                ratatui::widgets::Paragraph::new(message).style(style_muted()),
                chunks[1],
            );
            return;
        }

        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .map(|(i, rec)| self.render_item(rec, i == self.cursor, state, chunks[1].width))
            .collect();

        self.list_state.select(Some(self.cursor));
        let list = List::new(items);
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }
}
