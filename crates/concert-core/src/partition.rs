//! Upcoming/past partitioning and ordering.

use serde::{Deserialize, Serialize};

use crate::record::{ConcertRecord, ConcertStatus};

/// The two rendered lists. Replaced wholesale on every refresh cycle — there
/// is no incremental merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcertBoard {
    pub upcoming: Vec<ConcertRecord>,
    pub past: Vec<ConcertRecord>,
}

impl ConcertBoard {
    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty() && self.past.is_empty()
    }

    /// Look a record up by id across both lists.
    pub fn find(&self, id: i64) -> Option<&ConcertRecord> {
        self.upcoming
            .iter()
            .chain(self.past.iter())
            .find(|r| r.id == id)
    }
}

/// Split records by their `status` field — nothing else — and order each list.
///
/// Upcoming is sorted ascending by date (earliest first), past descending
/// (most recent first). Both sorts are stable, so records sharing a date keep
/// their original payload order; time-of-day is not part of the sort key.
/// Pure: same input, same output, no call-history dependence.
pub fn partition(records: Vec<ConcertRecord>) -> ConcertBoard {
    let (mut upcoming, mut past): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.status == ConcertStatus::Upcoming);
    upcoming.sort_by(|a, b| a.date.cmp(&b.date));
    past.sort_by(|a, b| b.date.cmp(&a.date));
    ConcertBoard { upcoming, past }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(id: i64, date: &str, status: ConcertStatus) -> ConcertRecord {
        ConcertRecord {
            id,
            name: format!("concert {id}"),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: None,
            location: None,
            genre: None,
            price: None,
            details: None,
            status,
        }
    }

    #[test]
    fn test_every_record_lands_in_exactly_one_list() {
        let records = vec![
            rec(1, "2024-04-15", ConcertStatus::Upcoming),
            rec(2, "2023-01-01", ConcertStatus::Past),
            rec(3, "2025-01-01", ConcertStatus::Past),
        ];
        let board = partition(records);
        assert_eq!(board.upcoming.len() + board.past.len(), 3);
        assert_eq!(board.upcoming.iter().map(|r| r.id).collect::<Vec<_>>(), [1]);
        let mut past_ids = board.past.iter().map(|r| r.id).collect::<Vec<_>>();
        past_ids.sort_unstable();
        assert_eq!(past_ids, [2, 3]);
    }

    #[test]
    fn test_status_not_date_decides_the_list() {
        // A past-dated record marked upcoming stays upcoming.
        let board = partition(vec![rec(1, "1999-01-01", ConcertStatus::Upcoming)]);
        assert_eq!(board.upcoming.len(), 1);
        assert!(board.past.is_empty());
    }

    #[test]
    fn test_upcoming_ascending_past_descending() {
        let board = partition(vec![
            rec(1, "2024-06-01", ConcertStatus::Upcoming),
            rec(2, "2024-04-15", ConcertStatus::Upcoming),
            rec(3, "2022-03-03", ConcertStatus::Past),
            rec(4, "2023-12-31", ConcertStatus::Past),
        ]);
        assert_eq!(board.upcoming.iter().map(|r| r.id).collect::<Vec<_>>(), [2, 1]);
        assert_eq!(board.past.iter().map(|r| r.id).collect::<Vec<_>>(), [4, 3]);
    }

    #[test]
    fn test_date_ties_keep_payload_order() {
        let board = partition(vec![
            rec(7, "2024-04-15", ConcertStatus::Upcoming),
            rec(3, "2024-04-15", ConcertStatus::Upcoming),
            rec(9, "2024-04-15", ConcertStatus::Upcoming),
        ]);
        assert_eq!(board.upcoming.iter().map(|r| r.id).collect::<Vec<_>>(), [7, 3, 9]);
    }

    #[test]
    fn test_partition_is_pure() {
        let records = vec![
            rec(1, "2024-04-15", ConcertStatus::Upcoming),
            rec(2, "2023-01-01", ConcertStatus::Past),
        ];
        let a = partition(records.clone());
        let b = partition(records);
        assert_eq!(a, b);
    }
}
