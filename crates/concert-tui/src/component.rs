//! Component trait — the interface every page implements.
//!
//! Design principles:
//! - Components are self-contained: they own their cursor/expansion state and
//!   render themselves.
//! - Components receive `AppState` (read-only) for data they don't own.
//! - Components produce `Vec<Action>` — they never mutate shared state
//!   directly. The App event-loop dispatches those actions.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    /// Which component is this?
    fn id(&self) -> ComponentId;

    /// Handle a key event. Returns actions to be dispatched.
    /// Only called when this component's page is showing.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Called after shared state changed (board replaced, selections toggled)
    /// so the component can clamp cursors and drop stale expansion state.
    fn sync(&mut self, _state: &AppState) {}

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState);
}
