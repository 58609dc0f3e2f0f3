//! AppState — shared read-only data passed to all components during
//! render/event handling.
//!
//! Components read this but never mutate it; the App event-loop is the only
//! writer, so every mutation is serialized on one queue.

use concert_core::partition::ConcertBoard;
use concert_core::record::ConcertRecord;
use concert_core::selection::Selections;
use concert_core::session::UserSession;

use crate::action::Page;

pub struct AppState {
    /// The two rendered lists, replaced wholesale by each admitted refresh.
    pub board: ConcertBoard,
    /// Cart + favorites. Owned here, at the application root, and only ever
    /// mutated through dispatched toggle actions.
    pub selections: Selections,

    pub page: Page,
    /// True until the first refresh event (success or failure) lands.
    pub loading: bool,
    /// Sticky fetch-error banner; cleared by the next successful refresh.
    /// Shown with the retry hint.
    pub error_message: Option<String>,
    /// Transient one-line status (last save/delete/toggle outcome).
    pub status: Option<String>,

    pub session: Option<UserSession>,
}

impl AppState {
    pub fn new(session: Option<UserSession>) -> Self {
        Self {
            board: ConcertBoard::default(),
            selections: Selections::default(),
            page: Page::Concerts,
            loading: true,
            error_message: None,
            status: None,
            session,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_admin())
    }

    /// Every record, upcoming first — the admin table ordering.
    pub fn all_records(&self) -> Vec<&ConcertRecord> {
        self.board
            .upcoming
            .iter()
            .chain(self.board.past.iter())
            .collect()
    }

    /// Whether a selected record is still present in the current listings.
    /// Selections are never pruned, so panes use this to mark orphans.
    pub fn is_listed(&self, id: i64) -> bool {
        self.board.find(id).is_some()
    }
}
