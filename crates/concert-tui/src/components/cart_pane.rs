//! CartPane component — the Cart page.
//!
//! Renders from the cart selection set only; a refreshed listing never prunes
//! entries, so records that dropped out of the current board are flagged
//! rather than removed.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{
    style_muted, style_secondary, style_selected_bold, C_ERROR, C_PRICE, C_PRIMARY,
};

pub struct CartPane {
    cursor: usize,
    list_state: ListState,
}

impl CartPane {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            list_state: ListState::default(),
        }
    }
}

impl Component for CartPane {
    fn id(&self) -> ComponentId {
        ComponentId::CartPane
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        let len = state.selections.cart.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    self.cursor = (self.cursor + 1).min(len - 1);
                }
            }
            KeyCode::Char('x') | KeyCode::Char('c') | KeyCode::Enter => {
                if let Some(rec) = state.selections.cart.iter().nth(self.cursor) {
                    return vec![Action::ToggleCart(rec.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn sync(&mut self, state: &AppState) {
        let len = state.selections.cart.len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let cart = &state.selections.cart;
        if cart.is_empty() {
            frame.render_widget(
                Paragraph::new("Your cart is empty. Press c on an upcoming concert to add it.")
                    .style(style_muted()),
                area,
            );
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let items: Vec<ListItem> = cart
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                let name_style = if i == self.cursor {
                    style_selected_bold()
                } else {
                    Style::default().fg(C_PRIMARY)
                };
                let mut spans = vec![
                    Span::styled(rec.name.clone(), name_style),
                    Span::styled(" — ", style_muted()),
                    Span::styled(
                        rec.price.clone().unwrap_or_else(|| "TBD".to_string()),
                        Style::default().fg(C_PRICE),
                    ),
                ];
                if !state.is_listed(rec.id) {
                    spans.push(Span::styled(
                        "  (no longer listed)",
                        Style::default().fg(C_ERROR),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        self.list_state.select(Some(self.cursor));
        frame.render_stateful_widget(List::new(items), chunks[0], &mut self.list_state);

        let footer = format!(
            "{} item{} in cart",
            cart.len(),
            if cart.len() == 1 { "" } else { "s" }
        );
        frame.render_widget(Paragraph::new(footer).style(style_secondary()), chunks[1]);
    }
}
