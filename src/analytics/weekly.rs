use crate::models::{Cents, Registration};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBucket {
    /// `YYYY-SWW`, ISO week-year and ISO week number
    pub week: String,
    pub registrations: i64,
    pub total_cents: Cents,
}

/// ISO 8601 week key for a calendar date.
///
/// The year is the ISO week-year, which differs from the calendar year for
/// the last days of December and the first days of January.
pub fn week_key(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{:04}-S{:02}", iso.year(), iso.week())
}

/// Buckets registrations by ISO week of their local calendar date.
/// Weeks without registrations are not emitted; keys sort chronologically.
pub fn compute_weekly(filtered: &[Registration]) -> Vec<WeeklyBucket> {
    let mut weeks: BTreeMap<String, (i64, Cents)> = BTreeMap::new();
    for registration in filtered {
        let entry = weeks
            .entry(week_key(registration.timestamp.date_naive()))
            .or_insert((0, 0));
        entry.0 += 1;
        entry.1 += registration.value_cents;
    }

    weeks
        .into_iter()
        .map(|(week, (registrations, total_cents))| WeeklyBucket {
            week,
            registrations,
            total_cents,
        })
        .collect()
}
