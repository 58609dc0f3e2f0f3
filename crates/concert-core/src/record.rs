//! Wire payload shapes and the canonical `ConcertRecord`.
//!
//! The API has shipped two envelope variants over its lifetime:
//!
//!   {"status": "success", "concerts": [...]}            (current)
//!   {"status": "success", "upcoming": [...], "past": [...]}  (older)
//!
//! and record ids have appeared as `id` or `concert_id`, as JSON numbers or
//! numeric strings. All of that tolerance lives here, at the boundary; nothing
//! past `normalize_payload` ever sees a raw shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::ApiError;

/// Authoritative upcoming/past classification. Supplied by the server; never
/// derived from date comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConcertStatus {
    Upcoming,
    #[default]
    Past,
}

impl ConcertStatus {
    /// `"upcoming"` (any case, surrounding whitespace ignored) maps to
    /// `Upcoming`; every other value, including absence, is `Past`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("upcoming") => Self::Upcoming,
            _ => Self::Past,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }
}

/// Canonical normalized representation of one concert event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcertRecord {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    /// Seconds are always zero after normalization. `Some(00:00)` is the
    /// "time TBD" sentinel, distinct from `None` (field absent entirely).
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub genre: Option<String>,
    /// Currency-formatted externally; stored verbatim.
    pub price: Option<String>,
    /// Shown only for past concerts.
    pub details: Option<String>,
    pub status: ConcertStatus,
}

/// One concert as it appears on the wire, before normalization. Every field
/// is optional so a malformed record degrades to a skip, not a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConcert {
    #[serde(default, alias = "concert_id", deserialize_with = "de_opt_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    /// One admin-panel iteration submitted this field as `type`.
    #[serde(default, alias = "type")]
    pub status: Option<String>,
}

/// The `get_concerts` response envelope, both variants.
#[derive(Debug, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub concerts: Option<Vec<RawConcert>>,
    #[serde(default)]
    pub upcoming: Option<Vec<RawConcert>>,
    #[serde(default)]
    pub past: Option<Vec<RawConcert>>,
}

/// Accept an id as a JSON number or a numeric string.
pub(crate) fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Int(i64),
        Str(String),
    }

    Ok(match Option::<IdRepr>::deserialize(deserializer)? {
        None => None,
        Some(IdRepr::Int(v)) => Some(v),
        Some(IdRepr::Str(s)) => s.trim().parse().ok(),
    })
}

/// Turn a full payload into canonical records.
///
/// Fails with `ApiError::Format` when the envelope itself is wrong (non-success
/// status, or no concert list at all). Individually malformed records are
/// skipped with a warning instead of aborting the refresh.
pub fn normalize_payload(payload: RawPayload) -> Result<Vec<ConcertRecord>, ApiError> {
    match payload.status.as_deref() {
        Some("success") => {}
        other => {
            let detail = payload
                .message
                .unwrap_or_else(|| other.unwrap_or("status field missing").to_string());
            return Err(ApiError::Format(format!("server reported failure: {detail}")));
        }
    }

    if let Some(raw) = payload.concerts {
        return Ok(raw
            .into_iter()
            .filter_map(|r| normalize_record(r, None))
            .collect());
    }

    if payload.upcoming.is_none() && payload.past.is_none() {
        return Err(ApiError::Format("payload contains no concert list".into()));
    }

    // Older split envelope: a record without its own status field takes the
    // status of the list it arrived in.
    let mut records = Vec::new();
    for raw in payload.upcoming.unwrap_or_default() {
        records.extend(normalize_record(raw, Some(ConcertStatus::Upcoming)));
    }
    for raw in payload.past.unwrap_or_default() {
        records.extend(normalize_record(raw, Some(ConcertStatus::Past)));
    }
    Ok(records)
}

/// Normalize one wire record. Returns `None` (with a warning) when the record
/// lacks an id, a name, or a parseable date.
pub fn normalize_record(
    raw: RawConcert,
    fallback_status: Option<ConcertStatus>,
) -> Option<ConcertRecord> {
    let Some(id) = raw.id else {
        warn!("skipping concert without usable id (name {:?})", raw.name);
        return None;
    };
    let name = match raw.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => {
            warn!("skipping concert {id}: empty name");
            return None;
        }
    };
    let Some(date) = raw.date.as_deref().and_then(parse_wire_date) else {
        warn!("skipping concert {id}: unparseable date {:?}", raw.date);
        return None;
    };

    let status = raw
        .status
        .as_deref()
        .map(|s| ConcertStatus::from_wire(Some(s)))
        .or(fallback_status)
        .unwrap_or_default();

    Some(ConcertRecord {
        id,
        name,
        date,
        time: raw.time.as_deref().and_then(parse_wire_time),
        location: non_empty(raw.location),
        genre: non_empty(raw.genre),
        price: non_empty(raw.price),
        details: non_empty(raw.details),
        status,
    })
}

/// `YYYY-MM-DD` is taken verbatim; a full timestamp keeps only its date
/// portion. Anything else is unusable.
fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Truncate to HH:MM — seconds are discarded, not rounded.
fn parse_wire_time(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let t = NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()?;
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawConcert {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_date_kept_verbatim() {
        let rec = normalize_record(
            raw(r#"{"id": 1, "name": "Orchestral Night", "date": "2024-04-15"}"#),
            None,
        )
        .unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
    }

    #[test]
    fn test_timestamp_truncated_to_date() {
        let rec = normalize_record(
            raw(r#"{"id": 2, "name": "X", "date": "2024-04-15T19:30:00Z"}"#),
            None,
        )
        .unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());

        let rec = normalize_record(
            raw(r#"{"id": 3, "name": "X", "date": "2024-04-15 19:30:00"}"#),
            None,
        )
        .unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
    }

    #[test]
    fn test_time_seconds_discarded() {
        let rec = normalize_record(
            raw(r#"{"id": 1, "name": "X", "date": "2024-04-15", "time": "19:30:45"}"#),
            None,
        )
        .unwrap();
        assert_eq!(rec.time, NaiveTime::from_hms_opt(19, 30, 0));
    }

    #[test]
    fn test_midnight_sentinel_survives_normalization() {
        // "00:00:00" means "time TBD" but is stored as a value, not erased —
        // the formatter owns the placeholder, not the normalizer.
        let rec = normalize_record(
            raw(r#"{"id": 1, "name": "X", "date": "2024-04-15", "time": "00:00:00"}"#),
            None,
        )
        .unwrap();
        assert_eq!(rec.time, NaiveTime::from_hms_opt(0, 0, 0));
    }

    #[test]
    fn test_missing_optionals_stored_as_none() {
        let rec = normalize_record(
            raw(r#"{"id": 1, "name": "X", "date": "2024-04-15", "location": "  ", "price": ""}"#),
            None,
        )
        .unwrap();
        assert!(rec.time.is_none());
        assert!(rec.location.is_none());
        assert!(rec.genre.is_none());
        assert!(rec.price.is_none());
        assert!(rec.details.is_none());
    }

    #[test]
    fn test_concert_id_alias_and_string_id() {
        let rec = normalize_record(
            raw(r#"{"concert_id": "17", "name": "X", "date": "2024-04-15"}"#),
            None,
        )
        .unwrap();
        assert_eq!(rec.id, 17);
    }

    #[test]
    fn test_status_rules() {
        assert_eq!(ConcertStatus::from_wire(Some("upcoming")), ConcertStatus::Upcoming);
        assert_eq!(ConcertStatus::from_wire(Some(" Upcoming ")), ConcertStatus::Upcoming);
        assert_eq!(ConcertStatus::from_wire(Some("cancelled")), ConcertStatus::Past);
        assert_eq!(ConcertStatus::from_wire(None), ConcertStatus::Past);
    }

    #[test]
    fn test_record_without_id_or_date_is_skipped() {
        assert!(normalize_record(raw(r#"{"name": "X", "date": "2024-04-15"}"#), None).is_none());
        assert!(normalize_record(raw(r#"{"id": 1, "name": "X", "date": "soon"}"#), None).is_none());
        assert!(normalize_record(raw(r#"{"id": 1, "name": "X"}"#), None).is_none());
        assert!(normalize_record(raw(r#"{"id": 1, "name": "  ", "date": "2024-04-15"}"#), None).is_none());
    }

    #[test]
    fn test_non_success_envelope_is_format_error() {
        let payload: RawPayload =
            serde_json::from_str(r#"{"status": "error", "message": "db down"}"#).unwrap();
        let err = normalize_payload(payload).unwrap_err();
        assert!(matches!(err, ApiError::Format(_)));
        assert!(err.to_string().contains("db down"));
    }

    #[test]
    fn test_success_without_any_list_is_format_error() {
        let payload: RawPayload = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(matches!(normalize_payload(payload), Err(ApiError::Format(_))));
    }

    #[test]
    fn test_split_envelope_stamps_status_from_list() {
        let payload: RawPayload = serde_json::from_str(
            r#"{
                "status": "success",
                "upcoming": [{"id": 1, "name": "A", "date": "2024-04-15"}],
                "past": [{"id": 2, "name": "B", "date": "2023-01-01"}]
            }"#,
        )
        .unwrap();
        let records = normalize_payload(payload).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, ConcertStatus::Upcoming);
        assert_eq!(records[1].status, ConcertStatus::Past);
    }

    #[test]
    fn test_explicit_status_beats_list_membership() {
        let payload: RawPayload = serde_json::from_str(
            r#"{
                "status": "success",
                "upcoming": [{"id": 1, "name": "A", "date": "2024-04-15", "status": "past"}]
            }"#,
        )
        .unwrap();
        let records = normalize_payload(payload).unwrap();
        assert_eq!(records[0].status, ConcertStatus::Past);
    }
}
