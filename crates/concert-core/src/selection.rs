//! Cart and favorites — toggle-membership sets keyed by record id.

use serde::{Deserialize, Serialize};

use crate::record::ConcertRecord;

/// An insertion-ordered set of concert records, membership keyed solely by
/// `id`. Entries hold a full record copy so the cart and favorites pages can
/// still render an entry after the record has dropped out of a refreshed
/// listing — selections are never pruned by a refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    entries: Vec<ConcertRecord>,
}

impl SelectionSet {
    /// Flip membership: remove the entry with this record's id if present,
    /// otherwise add a copy. Returns the new membership state.
    pub fn toggle(&mut self, record: &ConcertRecord) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.id == record.id) {
            self.entries.remove(pos);
            false
        } else {
            self.entries.push(record.clone());
            true
        }
    }

    pub fn has(&self, id: i64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConcertRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The two independently-owned selection sets, constructed once at the
/// application root and passed down — no ambient singletons.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    pub cart: SelectionSet,
    pub favorites: SelectionSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ConcertStatus;
    use chrono::NaiveDate;

    fn rec(id: i64) -> ConcertRecord {
        ConcertRecord {
            id,
            name: format!("concert {id}"),
            date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            time: None,
            location: None,
            genre: None,
            price: Some("$25".into()),
            details: None,
            status: ConcertStatus::Upcoming,
        }
    }

    #[test]
    fn test_toggle_once_adds_exactly_one_entry() {
        let mut set = SelectionSet::default();
        assert!(set.toggle(&rec(5)));
        assert_eq!(set.len(), 1);
        assert!(set.has(5));
    }

    #[test]
    fn test_toggle_twice_restores_prior_state() {
        let mut set = SelectionSet::default();
        set.toggle(&rec(5));
        assert!(!set.toggle(&rec(5)));
        assert!(set.is_empty());

        // And from a non-empty prior state.
        set.toggle(&rec(1));
        set.toggle(&rec(2));
        set.toggle(&rec(1));
        set.toggle(&rec(1));
        assert!(set.has(1));
        assert!(set.has(2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_membership_is_by_id_not_by_contents() {
        let mut set = SelectionSet::default();
        set.toggle(&rec(5));
        let mut renamed = rec(5);
        renamed.name = "different billing".into();
        assert!(!set.toggle(&renamed));
        assert!(set.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut set = SelectionSet::default();
        for id in [3, 1, 2] {
            set.toggle(&rec(id));
        }
        let ids: Vec<i64> = set.iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 1, 2]);
    }

    #[test]
    fn test_cart_and_favorites_are_independent() {
        let mut selections = Selections::default();
        selections.cart.toggle(&rec(5));
        assert!(selections.cart.has(5));
        assert!(!selections.favorites.has(5));
    }
}
