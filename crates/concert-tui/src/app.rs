//! App — the component-based event loop.
//!
//! Architecture:
//! - `App` owns all page components and `AppState` (shared read-only data).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks: keyboard input, refresh cycles, save/delete results. Every state
//!   mutation happens in `handle_message`, so mutations are serialized on one
//!   queue and no two handlers interleave.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Refresh events pass through a `SeqGate` so a slow, stale response can
//!   never clobber a fresher board.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use concert_core::client::ApiClient;
use concert_core::config::Config;
use concert_core::refresh::{spawn_refresh, RefreshEvent, RefreshHandle, SeqGate};
use concert_core::session::UserSession;

use crate::action::{Action, Page};
use crate::app_state::AppState;
use crate::component::Component;
use crate::components::{
    admin_panel::AdminPanel, cart_pane::CartPane, concert_list::ConcertList,
    favorites_pane::FavoritesPane,
};
use crate::theme::{
    style_accent, style_error, style_muted, style_secondary, C_ACCENT, C_PRIMARY, C_STATUS_OK,
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Refresh(RefreshEvent),
    Saved(Result<Option<i64>, String>),
    Deleted(i64, Result<(), String>),
}

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub state: AppState,

    concert_list: ConcertList,
    cart_pane: CartPane,
    favorites_pane: FavoritesPane,
    admin_panel: AdminPanel,

    client: Arc<ApiClient>,
    config: Config,
    gate: SeqGate,

    msg_tx: mpsc::Sender<AppMessage>,
    msg_rx: Option<mpsc::Receiver<AppMessage>>,

    spinner_frame: usize,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, client: Arc<ApiClient>, session: Option<UserSession>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(256);
        Self {
            state: AppState::new(session),
            concert_list: ConcertList::new(),
            cart_pane: CartPane::new(),
            favorites_pane: FavoritesPane::new(),
            admin_panel: AdminPanel::new(),
            client,
            config,
            gate: SeqGate::default(),
            msg_tx,
            msg_rx: Some(msg_rx),
            spinner_frame: 0,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let mut rx = self
            .msg_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("run() called twice"))?;

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = self.msg_tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Refresh controller ────────────────────────────────────────────────
        let period = if self.config.refresh.auto_refresh {
            self.config.refresh.period()
        } else {
            // Manual-only mode: the immediate first fetch still runs; the next
            // periodic tick is a day out, i.e. effectively never.
            Duration::from_secs(60 * 60 * 24)
        };
        let (refresh_tx, mut refresh_rx) = mpsc::channel(16);
        let fetch_client = Arc::clone(&self.client);
        let refresh_handle = spawn_refresh(period, refresh_tx, move || {
            let client = Arc::clone(&fetch_client);
            async move { client.fetch_concerts().await }
        });
        let forward_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            while let Some(ev) = refresh_rx.recv().await {
                if forward_tx.send(AppMessage::Refresh(ev)).await.is_err() {
                    break;
                }
            }
        });

        // Spinner animation while a fetch is outstanding.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(120));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg, &refresh_handle);
                    while let Ok(next) = rx.try_recv() {
                        needs_redraw |= self.handle_message(next, &refresh_handle);
                    }
                }
                _ = ui_tick.tick() => {
                    if self.state.loading {
                        self.spinner_frame = self.spinner_frame.wrapping_add(1);
                        needs_redraw = true;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        // The poller must not outlive the view; in-flight responses die with
        // the closed channel.
        refresh_handle.shutdown().await;
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handling ──────────────────────────────────────────────────────

    fn handle_message(&mut self, msg: AppMessage, refresh: &RefreshHandle) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => self.handle_key(key, refresh),
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::Refresh(event) => self.apply_refresh(event),
            AppMessage::Saved(result) => {
                match &result {
                    Ok(id) => {
                        info!("concert saved (id {:?})", id);
                        self.state.status = Some("Concert saved".to_string());
                        refresh.request_now();
                    }
                    Err(e) => {
                        warn!("concert save failed: {e}");
                        self.state.status = Some(format!("Save failed: {e}"));
                    }
                }
                self.admin_panel.on_save_result(&result);
                true
            }
            AppMessage::Deleted(id, result) => {
                match result {
                    Ok(()) => {
                        info!("concert {id} deleted");
                        self.state.status = Some("Concert deleted".to_string());
                        refresh.request_now();
                    }
                    Err(e) => {
                        warn!("concert {id} delete failed: {e}");
                        self.state.status = Some(format!("Delete failed: {e}"));
                    }
                }
                true
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, refresh: &RefreshHandle) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        // While the admin form overlay is open it owns the keyboard.
        let form_open = self.state.page == Page::Admin && self.admin_panel.form_open();
        if !form_open {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return false;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.should_quit = true;
                    return false;
                }
                KeyCode::Char('1') => return self.dispatch(Action::SwitchPage(Page::Concerts), refresh),
                KeyCode::Char('2') => return self.dispatch(Action::SwitchPage(Page::Cart), refresh),
                KeyCode::Char('3') => return self.dispatch(Action::SwitchPage(Page::Favorites), refresh),
                KeyCode::Char('4') => return self.dispatch(Action::SwitchPage(Page::Admin), refresh),
                KeyCode::Char('r') => return self.dispatch(Action::RefreshNow, refresh),
                _ => {}
            }
        }

        let actions = match self.state.page {
            Page::Concerts => self.concert_list.handle_key(key, &self.state),
            Page::Cart => self.cart_pane.handle_key(key, &self.state),
            Page::Favorites => self.favorites_pane.handle_key(key, &self.state),
            Page::Admin => self.admin_panel.handle_key(key, &self.state),
        };
        let mut redraw = true;
        for action in actions {
            redraw |= self.dispatch(action, refresh);
        }
        redraw
    }

    fn dispatch(&mut self, action: Action, refresh: &RefreshHandle) -> bool {
        match action {
            Action::SwitchPage(page) => {
                if page == Page::Admin && !self.state.is_admin() {
                    self.state.status =
                        Some("Admin page requires an admin login (run: concerts login)".to_string());
                    return true;
                }
                self.state.page = page;
                true
            }
            Action::ToggleCart(record) => {
                let added = self.state.selections.cart.toggle(&record);
                self.state.status = Some(if added {
                    format!("Added \"{}\" to cart", record.name)
                } else {
                    format!("Removed \"{}\" from cart", record.name)
                });
                self.sync_components();
                true
            }
            Action::ToggleFavorite(record) => {
                let added = self.state.selections.favorites.toggle(&record);
                self.state.status = Some(if added {
                    format!("Favorited \"{}\"", record.name)
                } else {
                    format!("Unfavorited \"{}\"", record.name)
                });
                self.sync_components();
                true
            }
            Action::RefreshNow => {
                self.state.loading = true;
                refresh.request_now();
                true
            }
            Action::SubmitConcert(form) => {
                let client = Arc::clone(&self.client);
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.save_concert(&form).await.map_err(|e| e.to_string());
                    let _ = tx.send(AppMessage::Saved(result)).await;
                });
                self.state.status = Some("Saving…".to_string());
                true
            }
            Action::DeleteConcert(id) => {
                let client = Arc::clone(&self.client);
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.delete_concert(id).await.map_err(|e| e.to_string());
                    let _ = tx.send(AppMessage::Deleted(id, result)).await;
                });
                self.state.status = Some("Deleting…".to_string());
                true
            }
            Action::SetStatus(message) => {
                self.state.status = Some(message);
                true
            }
            Action::Quit => {
                self.should_quit = true;
                false
            }
            Action::Noop => false,
        }
    }

    fn apply_refresh(&mut self, event: RefreshEvent) -> bool {
        let seq = event.seq();
        if !self.gate.admit(seq) {
            debug!("discarding stale refresh response (seq {seq}, latest {})", self.gate.latest());
            return false;
        }
        match event {
            RefreshEvent::Loaded { board, .. } => {
                debug!(
                    "refresh {seq} applied: {} upcoming, {} past",
                    board.upcoming.len(),
                    board.past.len()
                );
                self.state.loading = false;
                self.state.error_message = None;
                // Wholesale replacement — selections are left untouched.
                self.state.board = board;
                self.sync_components();
            }
            RefreshEvent::Failed { error, .. } => {
                warn!("refresh {seq} failed: {error}");
                self.state.loading = false;
                self.state.error_message = Some(error);
            }
        }
        true
    }

    fn sync_components(&mut self) {
        self.concert_list.sync(&self.state);
        self.cart_pane.sync(&self.state);
        self.favorites_pane.sync(&self.state);
        self.admin_panel.sync(&self.state);
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = chunks[1].inner(ratatui::layout::Margin {
            horizontal: 1,
            vertical: 0,
        });
        match self.state.page {
            Page::Concerts => self.concert_list.draw(frame, body, &self.state),
            Page::Cart => self.cart_pane.draw(frame, body, &self.state),
            Page::Favorites => self.favorites_pane.draw(frame, body, &self.state),
            Page::Admin => self.admin_panel.draw(frame, body, &self.state),
        }

        self.draw_status(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " ConcertConnect ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )];

        let pages: [(Page, &str); 4] = [
            (Page::Concerts, "1 Concerts"),
            (Page::Cart, "2 Cart"),
            (Page::Favorites, "3 Favorites"),
            (Page::Admin, "4 Admin"),
        ];
        for (page, label) in pages {
            let style = if page == self.state.page {
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
            } else if page == Page::Admin && !self.state.is_admin() {
                style_muted()
            } else {
                style_secondary()
            };
            spans.push(Span::styled(format!(" {label} "), style));
        }

        let count = self.state.selections.cart.len();
        if count > 0 {
            spans.push(Span::styled(format!(" ⛁ {count} "), style_accent()));
        }
        if let Some(session) = &self.state.session {
            let badge = if session.is_admin() { " (admin)" } else { "" };
            spans.push(Span::styled(
                format!(" {}{badge} ", session.display_name()),
                style_secondary(),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(error) = &self.state.error_message {
            Line::from(Span::styled(
                format!(" ⚠ {error} — press r to retry"),
                style_error(),
            ))
        } else if self.state.loading {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            Line::from(Span::styled(
                format!(" {glyph} Loading concerts…"),
                style_secondary(),
            ))
        } else if let Some(status) = &self.state.status {
            Line::from(Span::styled(
                format!(" {status}"),
                Style::default().fg(C_STATUS_OK),
            ))
        } else {
            Line::from(Span::styled(
                " q quit · r refresh · tab switch list · c cart · f favorite · enter details",
                style_muted(),
            ))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
