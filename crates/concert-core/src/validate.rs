//! Client-side form validation for the admin panel.
//!
//! A form that fails validation never reaches the network layer.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::record::{ConcertRecord, ConcertStatus};

const NAME_MAX: usize = 200;
const LOCATION_MAX: usize = 200;
const GENRE_MAX: usize = 100;
const PRICE_MAX: usize = 32;
const DETAILS_MAX: usize = 2000;

/// Editable concert fields as the admin form holds them: raw text, converted
/// and checked on submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConcertForm {
    /// Present when editing an existing record, absent when adding.
    pub id: Option<i64>,
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub details: String,
    pub genre: String,
    pub price: String,
    pub status: ConcertStatus,
}

impl ConcertForm {
    /// Prefill from an existing record for editing.
    pub fn from_record(record: &ConcertRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name.clone(),
            date: record.date.format("%Y-%m-%d").to_string(),
            time: record
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            location: record.location.clone().unwrap_or_default(),
            details: record.details.clone().unwrap_or_default(),
            genre: record.genre.clone().unwrap_or_default(),
            price: record.price.clone().unwrap_or_default(),
            status: record.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation failed: {}", .issues.join("; "))]
pub struct ValidationError {
    pub issues: Vec<String>,
}

/// Check every field; collect all problems rather than stopping at the first.
pub fn validate(form: &ConcertForm) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    let name = form.name.trim();
    if name.is_empty() {
        issues.push("name is required".to_string());
    } else if name.chars().count() > NAME_MAX {
        issues.push(format!("name exceeds {NAME_MAX} characters"));
    }

    let date = form.date.trim();
    if date.is_empty() {
        issues.push("date is required".to_string());
    } else if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        issues.push("date must be YYYY-MM-DD".to_string());
    }

    let time = form.time.trim();
    if !time.is_empty()
        && NaiveTime::parse_from_str(time, "%H:%M:%S").is_err()
        && NaiveTime::parse_from_str(time, "%H:%M").is_err()
    {
        issues.push("time must be HH:MM".to_string());
    }

    if form.location.trim().chars().count() > LOCATION_MAX {
        issues.push(format!("location exceeds {LOCATION_MAX} characters"));
    }
    if form.genre.trim().chars().count() > GENRE_MAX {
        issues.push(format!("genre exceeds {GENRE_MAX} characters"));
    }
    if form.price.trim().chars().count() > PRICE_MAX {
        issues.push(format!("price exceeds {PRICE_MAX} characters"));
    }
    if form.details.trim().chars().count() > DETAILS_MAX {
        issues.push(format!("details exceed {DETAILS_MAX} characters"));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}
