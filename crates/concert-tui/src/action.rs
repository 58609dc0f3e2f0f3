//! Action enum — all user-initiated intents and internal events.

use concert_core::record::ConcertRecord;
use concert_core::validate::ConcertForm;

/// Unique identifier for a page component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    ConcertList,
    CartPane,
    FavoritesPane,
    AdminPanel,
}

/// Which page is showing. Mirrors the original site's navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Concerts,
    Cart,
    Favorites,
    Admin,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Self::Concerts => "Concerts",
            Self::Cart => "Cart",
            Self::Favorites => "Favorites",
            Self::Admin => "Admin",
        }
    }
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    SwitchPage(Page),

    // ── Selection sets ───────────────────────────────────────────────────────
    /// Flip cart membership for this record.
    ToggleCart(ConcertRecord),
    /// Flip favorites membership for this record.
    ToggleFavorite(ConcertRecord),

    // ── Data ─────────────────────────────────────────────────────────────────
    /// Force a refresh cycle now (also the retry affordance after a failure).
    RefreshNow,
    /// Submit a locally-validated admin form to the API.
    SubmitConcert(ConcertForm),
    DeleteConcert(i64),

    // ── System ───────────────────────────────────────────────────────────────
    SetStatus(String),
    Quit,
    Noop,
}
