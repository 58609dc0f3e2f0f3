//! End-to-end payload handling: both envelope variants the API has shipped,
//! decoded, normalized, and partitioned.

use concert_core::partition::partition;
use concert_core::record::{normalize_payload, RawPayload};

fn run(body: &str) -> concert_core::partition::ConcertBoard {
    let payload: RawPayload = serde_json::from_str(body).expect("payload should decode");
    partition(normalize_payload(payload).expect("payload should normalize"))
}

#[test]
fn current_envelope_partitions_by_status() {
    let board = run(
        r#"{
            "status": "success",
            "concerts": [
                {"id": 1, "name": "Midnight Quartet", "status": "upcoming",
                 "date": "2024-04-15", "time": "19:30:00", "location": "The Blue Room",
                 "genre": "Jazz", "price": "$25"},
                {"id": 2, "name": "Winter Gala", "status": "past",
                 "date": "2023-01-01", "details": "Sold out both nights."}
            ]
        }"#,
    );

    assert_eq!(board.upcoming.iter().map(|r| r.id).collect::<Vec<_>>(), [1]);
    assert_eq!(board.past.iter().map(|r| r.id).collect::<Vec<_>>(), [2]);
    assert_eq!(board.find(1).unwrap().location.as_deref(), Some("The Blue Room"));
    assert_eq!(
        board.find(2).unwrap().details.as_deref(),
        Some("Sold out both nights.")
    );
}

#[test]
fn older_split_envelope_is_tolerated() {
    let board = run(
        r#"{
            "status": "success",
            "upcoming": [
                {"concert_id": "11", "name": "Spring Opener", "date": "2024-05-01T20:00:00"}
            ],
            "past": [
                {"id": 12, "name": "Fall Closer", "date": "2023-10-31", "time": "00:00:00"}
            ]
        }"#,
    );

    // List membership stamps the status; the alias id and timestamp date both
    // normalize away at the boundary.
    assert_eq!(board.upcoming.iter().map(|r| r.id).collect::<Vec<_>>(), [11]);
    assert_eq!(board.past.iter().map(|r| r.id).collect::<Vec<_>>(), [12]);
    assert_eq!(board.find(11).unwrap().date.to_string(), "2024-05-01");
    // The 00:00:00 sentinel survives as a stored value.
    assert!(board.find(12).unwrap().time.is_some());
}

#[test]
fn malformed_records_are_skipped_not_fatal() {
    let board = run(
        r#"{
            "status": "success",
            "concerts": [
                {"name": "No Id", "date": "2024-04-15"},
                {"id": 3, "name": "Kept", "date": "2024-04-15", "status": "upcoming"},
                {"id": 4, "name": "Bad Date", "date": "next friday"}
            ]
        }"#,
    );

    assert_eq!(board.upcoming.len() + board.past.len(), 1);
    assert_eq!(board.upcoming[0].name, "Kept");
}
